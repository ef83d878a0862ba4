//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::cover_letter::{write_cover_letter, CoverLetter, LetterContext};
use crate::generation::suggestions::{
    impact_suggestions, keyword_suggestions, profile_gap_suggestions, rewrite_suggestions,
    SuggestionsResponse,
};
use crate::generation::tone::CoverLetterTone;
use crate::jobs::keywords::{extract_keywords, Keyword};
use crate::jobs::repository::get_owned_job;
use crate::profile::completeness::compute_completeness_report;
use crate::profile::repository::get_snapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    pub job_text: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    pub job_text: Option<String>,
}

/// The job a generation request targets, from a saved posting or pasted text.
struct TargetJob {
    text: String,
    title: Option<String>,
    company: Option<String>,
    keywords: Vec<Keyword>,
}

async fn resolve_job(
    state: &AppState,
    user_id: Uuid,
    job_id: Option<Uuid>,
    job_text: Option<&str>,
) -> Result<Option<TargetJob>, AppError> {
    let job_text = job_text.map(str::trim).filter(|t| !t.is_empty());
    match (job_id, job_text) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Provide either job_id or job_text, not both".to_string(),
        )),
        (Some(id), None) => {
            let job = get_owned_job(&state.db, user_id, id).await?;
            Ok(Some(TargetJob {
                text: job.description,
                title: Some(job.title),
                company: job.company,
                keywords: job.keywords.0,
            }))
        }
        (None, Some(text)) => Ok(Some(TargetJob {
            text: text.to_string(),
            title: None,
            company: None,
            keywords: extract_keywords(text, state.config.keyword_top_n),
        })),
        (None, None) => Ok(None),
    }
}

/// POST /api/v1/generation/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetter>, AppError> {
    let tone = match req.tone.as_deref() {
        Some(raw) => CoverLetterTone::parse(raw)?,
        None => CoverLetterTone::default(),
    };
    let job = resolve_job(&state, req.user_id, req.job_id, req.job_text.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Validation("A cover letter needs job_id or job_text".to_string())
        })?;

    let profile = get_snapshot(&state.db, req.user_id).await?;
    let fit = state.fit_scorer.score(&profile, &job.keywords).await?;

    let ctx = LetterContext {
        profile: &profile,
        job_text: &job.text,
        company: req.company.as_deref().or(job.company.as_deref()),
        role: req.role.as_deref().or(job.title.as_deref()),
        tone,
        fit: &fit,
    };
    Ok(Json(write_cover_letter(state.llm.as_ref(), &ctx).await))
}

/// POST /api/v1/generation/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let job = resolve_job(&state, req.user_id, req.job_id, req.job_text.as_deref()).await?;
    let profile = get_snapshot(&state.db, req.user_id).await?;
    let completeness = compute_completeness_report(&profile);

    let fit = match &job {
        Some(job) => Some(state.fit_scorer.score(&profile, &job.keywords).await?),
        None => None,
    };

    let impact = impact_suggestions(&profile);
    let mut suggestions = impact.clone();
    if let Some(fit) = &fit {
        suggestions.extend(keyword_suggestions(fit));
    }
    suggestions.extend(profile_gap_suggestions(&completeness));

    let mut rewrites_generated = false;
    if let Some(llm) = &state.llm {
        let keywords = fit.as_ref().map(|f| f.matched_keywords()).unwrap_or_default();
        let rewrites = rewrite_suggestions(llm, &impact, &keywords).await;
        rewrites_generated = !rewrites.is_empty();
        suggestions.extend(rewrites);
    }

    Ok(Json(SuggestionsResponse {
        suggestions,
        completeness_score: completeness.overall_score,
        fit_score: fit.map(|f| f.overall_score),
        rewrites_generated,
    }))
}
