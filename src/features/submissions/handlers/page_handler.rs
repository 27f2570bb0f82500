//! Server-rendered form and admin pages.
//!
//! Failures never produce the JSON envelope here: they are logged and shown
//! as a toast, either on a re-rendered page or after a redirect.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::submissions::dtos::{DocumentDisposition, SubmissionFormInput};
use crate::features::submissions::handlers::submission_handler::{
    document_failure_message, submit_multipart, SubmissionState,
};
use crate::features::submissions::models::SubmissionStatus;
use crate::features::submissions::services::SubmissionSnapshot;
use crate::features::submissions::views::{
    detail_url, listing_url, AdminPageQuery, AdminPageView, DocumentPageQuery, FormPageView,
    StatusForm,
};
use crate::shared::messages;
use crate::shared::pages::render_page;
use crate::shared::types::Toast;

fn render_form(input: SubmissionFormInput, toast: Option<Toast>) -> Result<Html<String>> {
    let html = render_page("form.jinja", FormPageView::build(input, toast))?;
    Ok(Html(html))
}

fn with_toast(path: &str, toast: &Toast) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, toast.to_query())
}

pub async fn form_page() -> Result<Html<String>> {
    render_form(SubmissionFormInput::default(), None)
}

pub async fn submit_form_page(
    State(state): State<SubmissionState>,
    multipart: Multipart,
) -> Result<Response> {
    let mut input = SubmissionFormInput::default();

    match submit_multipart(&state.service, multipart, &mut input).await {
        Ok(_) => {
            let target = with_toast(
                &state.admin_redirect_path,
                &Toast::success(messages::SUBMIT_SUCCESS),
            );
            Ok(Redirect::to(&target).into_response())
        }
        Err(e) => {
            e.log();
            tracing::debug!("Submission rejected: {}", e);
            let status = e.status_code();
            let page = render_form(input, Some(Toast::error(messages::submit_failed(&e))))?;
            Ok((status, page).into_response())
        }
    }
}

pub async fn admin_page(
    State(state): State<SubmissionState>,
    AppQuery(query): AppQuery<AdminPageQuery>,
) -> Result<Response> {
    let (status, snapshot, toast) = match state.service.load_snapshot().await {
        Ok(snapshot) => (StatusCode::OK, snapshot, query.toast()),
        Err(e) => {
            e.log();
            (
                e.status_code(),
                SubmissionSnapshot::empty(),
                Some(Toast::error(messages::LOAD_FAILED)),
            )
        }
    };

    let html = render_page(
        "admin.jinja",
        AdminPageView::build(&snapshot, &query, toast),
    )?;
    Ok((status, Html(html)).into_response())
}

pub async fn update_status_page(
    State(state): State<SubmissionState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let search = form.search.as_deref();
    let status = form
        .status
        .as_deref()
        .map(str::parse::<SubmissionStatus>)
        .transpose();

    let toast = match status {
        Ok(Some(status)) => match state.service.update_status(id, status).await {
            Ok(_) => Toast::success(messages::status_updated(status)),
            Err(e) => {
                e.log();
                tracing::debug!("Status update for {} failed: {}", id, e);
                Toast::error(messages::UPDATE_STATUS_FAILED)
            }
        },
        Ok(None) | Err(_) => Toast::error(messages::UPDATE_STATUS_FAILED),
    };

    Redirect::to(&listing_url(search, &toast))
}

pub async fn document_page(
    State(state): State<SubmissionState>,
    Path(id): Path<i64>,
    AppQuery(params): AppQuery<DocumentPageQuery>,
) -> Response {
    let disposition = params.disposition();

    let result = match disposition {
        DocumentDisposition::View => state
            .service
            .document_link(id, disposition)
            .await
            .map(|link| Redirect::to(&link.url).into_response()),
        DocumentDisposition::Download => match state.service.download_document(id).await {
            Ok(content) => {
                attachment_response(&content.filename, content.content_type, content.data)
            }
            Err(e) => Err(e),
        },
    };

    result.unwrap_or_else(|e| {
        e.log();
        tracing::debug!("File access for {} failed: {}", id, e);
        let toast = Toast::error(document_failure_message(disposition));
        Redirect::to(&detail_url(id, &toast)).into_response()
    })
}

fn attachment_response(filename: &str, content_type: &str, data: Vec<u8>) -> Result<Response> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .map_err(|e| AppError::Internal(format!("Invalid download filename: {}", e)))?;
    let content_type = HeaderValue::from_str(content_type)
        .map_err(|e| AppError::Internal(format!("Invalid content type: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// `attachment` header with an ASCII fallback and the exact UTF-8 name
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}
