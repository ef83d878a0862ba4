//! Job-posting analysis: keyword extraction, storage and profile fit scoring.

pub mod fit_scoring;
pub mod handlers;
pub mod keywords;
pub mod repository;
pub mod stopwords;
