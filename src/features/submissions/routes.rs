use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::features::submissions::handlers::{self, SubmissionState};
use crate::features::submissions::services::SubmissionService;
use crate::shared::constants::{ADMIN_PAGE_PATH, FORM_PAGE_PATH, MAX_FILE_SIZE, MULTIPART_OVERHEAD};

/// Create routes for the submissions feature
///
/// JSON API under `/api`, plus the server-rendered form and admin pages
pub fn routes(service: Arc<SubmissionService>, admin_redirect_path: &str) -> Router {
    let state = SubmissionState::new(service, admin_redirect_path);
    let upload_limit = DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/api/submissions",
            post(handlers::create_submission).layer(upload_limit),
        )
        .route("/api/submissions/options", get(handlers::get_form_options))
        .route("/api/admin/submissions", get(handlers::list_submissions))
        .route("/api/admin/submissions/{id}", get(handlers::get_submission))
        .route(
            "/api/admin/submissions/{id}/status",
            patch(handlers::update_submission_status),
        )
        .route(
            "/api/admin/submissions/{id}/file",
            get(handlers::get_submission_document),
        )
        .route(
            FORM_PAGE_PATH,
            get(handlers::form_page)
                .post(handlers::submit_form_page)
                .layer(upload_limit),
        )
        .route(ADMIN_PAGE_PATH, get(handlers::admin_page))
        .route(
            &format!("{}/{{id}}/status", ADMIN_PAGE_PATH),
            post(handlers::update_status_page),
        )
        .route(
            &format!("{}/{{id}}/file", ADMIN_PAGE_PATH),
            get(handlers::document_page),
        )
        .with_state(state)
}
