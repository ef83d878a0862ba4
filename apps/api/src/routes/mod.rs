pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::documents::handlers as documents;
use crate::generation::handlers as generation;
use crate::jobs::handlers as jobs;
use crate::parser::handlers as parser;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé parsing
        .route("/api/v1/resumes/parse", post(parser::handle_parse_text))
        .route("/api/v1/resumes/parse-pdf", post(parser::handle_parse_pdf))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        .route(
            "/api/v1/profile/completeness",
            get(profile::handle_completeness),
        )
        .route("/api/v1/profile/import", post(profile::handle_import))
        .route(
            "/api/v1/profile/experiences",
            post(profile::handle_add_experience),
        )
        .route(
            "/api/v1/profile/experiences/:id",
            put(profile::handle_update_experience).delete(profile::handle_delete_experience),
        )
        .route(
            "/api/v1/profile/educations",
            post(profile::handle_add_education),
        )
        .route(
            "/api/v1/profile/educations/:id",
            put(profile::handle_update_education).delete(profile::handle_delete_education),
        )
        .route("/api/v1/profile/skills", post(profile::handle_add_skill))
        .route(
            "/api/v1/profile/skills/:id",
            put(profile::handle_update_skill).delete(profile::handle_delete_skill),
        )
        // Job postings
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze))
        .route("/api/v1/jobs/score", post(jobs::handle_score_text))
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/score", post(jobs::handle_score_job))
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::handle_list_documents).post(documents::handle_create_document),
        )
        .route(
            "/api/v1/documents/:id",
            get(documents::handle_get_document).delete(documents::handle_delete_document),
        )
        .route(
            "/api/v1/documents/:id/render",
            post(documents::handle_render_document),
        )
        .route(
            "/api/v1/documents/:id/versions",
            get(documents::handle_list_versions),
        )
        .route(
            "/api/v1/documents/:id/versions/:v",
            get(documents::handle_get_version),
        )
        .route(
            "/api/v1/documents/:id/export",
            get(documents::handle_export_document),
        )
        // Applications
        .route("/api/v1/applications/stats", get(applications::handle_stats))
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application)
                .patch(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_change_status),
        )
        // Generation
        .route(
            "/api/v1/generation/cover-letter",
            post(generation::handle_cover_letter),
        )
        .route(
            "/api/v1/generation/suggestions",
            post(generation::handle_suggestions),
        )
        .with_state(state)
}
