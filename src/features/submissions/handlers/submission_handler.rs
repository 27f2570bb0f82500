use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::submissions::dtos::{
    status_count_dtos, DocumentDisposition, DocumentLinkDto, DocumentQueryParams, FormOptionsDto,
    SubmissionCreatedDto, SubmissionFormInput, SubmissionListDto, SubmissionQueryParams,
    SubmissionResponseDto, SubmitSubmissionDto, UpdateSubmissionStatusDto, UploadedDocument,
};
use crate::features::submissions::models::Submission;
use crate::features::submissions::services::SubmissionService;
use crate::shared::messages;
use crate::shared::types::{ApiResponse, Meta};

/// State for submission handlers
#[derive(Clone)]
pub struct SubmissionState {
    pub service: Arc<SubmissionService>,
    /// Where a submitter is sent after a successful submission
    pub admin_redirect_path: Arc<str>,
}

impl SubmissionState {
    pub fn new(service: Arc<SubmissionService>, admin_redirect_path: &str) -> Self {
        Self {
            service,
            admin_redirect_path: Arc::from(admin_redirect_path),
        }
    }
}

const DOCUMENT_FIELD: &str = "fileSurat";

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(messages::FILE_TOO_LARGE.to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Read the submission form into `input`, returning the uploaded letter.
///
/// Text fields land in `input` as they arrive, so whatever was read stays
/// available to the caller even when a later field fails.
pub(crate) async fn read_submission_form(
    mut multipart: Multipart,
    input: &mut SubmissionFormInput,
) -> Result<Option<UploadedDocument>> {
    let mut document = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == DOCUMENT_FIELD {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field.file_name().map(|s| s.to_string()).unwrap_or_default();
            let data = field.bytes().await.map_err(multipart_error)?;

            document = Some(UploadedDocument {
                file_name,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        if !input.set(&field_name, value) {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    Ok(document)
}

/// Parse a multipart submission and hand it to the service
pub(crate) async fn submit_multipart(
    service: &SubmissionService,
    multipart: Multipart,
    input: &mut SubmissionFormInput,
) -> Result<Submission> {
    let document = read_submission_form(multipart, input).await?;
    let dto = input.to_dto()?;
    service.submit(dto, document).await
}

/// Submit a re-calibration request
///
/// Accepts multipart/form-data with the form fields and the `fileSurat`
/// document (.pdf, .doc, .docx, at most 10 MB).
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "submissions",
    request_body(
        content = SubmitSubmissionDto,
        content_type = "multipart/form-data",
        description = "Submission form with the supporting letter",
    ),
    responses(
        (status = 201, description = "Submission stored", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Invalid form data"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Storage unavailable")
    )
)]
pub async fn create_submission(
    State(state): State<SubmissionState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionCreatedDto>>)> {
    let mut input = SubmissionFormInput::default();
    let submission = submit_multipart(&state.service, multipart, &mut input)
        .await
        .map_err(|e| {
            let message = messages::submit_failed(&e);
            e.with_message(message)
        })?;

    let created = SubmissionCreatedDto {
        submission: submission.into(),
        redirect_to: state.admin_redirect_path.to_string(),
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(created),
            Some(messages::SUBMIT_SUCCESS.to_string()),
            None,
        )),
    ))
}

/// Choice lists for the submission form
#[utoipa::path(
    get,
    path = "/api/submissions/options",
    tag = "submissions",
    responses(
        (status = 200, description = "Form options", body = ApiResponse<FormOptionsDto>)
    )
)]
pub async fn get_form_options() -> Json<ApiResponse<FormOptionsDto>> {
    Json(ApiResponse::success(
        Some(FormOptionsDto::build()),
        None,
        None,
    ))
}

/// List submissions with status counts
///
/// Counts always cover every record; `search` only narrows `items`.
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    tag = "admin-submissions",
    params(SubmissionQueryParams),
    responses(
        (status = 200, description = "Submissions, newest first", body = ApiResponse<SubmissionListDto>),
        (status = 500, description = "Failed to load submissions")
    )
)]
pub async fn list_submissions(
    State(state): State<SubmissionState>,
    AppQuery(params): AppQuery<SubmissionQueryParams>,
) -> Result<Json<ApiResponse<SubmissionListDto>>> {
    let snapshot = state
        .service
        .load_snapshot()
        .await
        .map_err(|e| e.with_message(messages::LOAD_FAILED))?;

    let search = params.search.unwrap_or_default();
    let items: Vec<SubmissionResponseDto> = snapshot
        .filter(&search)
        .into_iter()
        .cloned()
        .map(SubmissionResponseDto::from)
        .collect();
    let total = items.len() as i64;

    let list = SubmissionListDto {
        counts: status_count_dtos(&snapshot.status_counts()),
        items,
    };

    Ok(Json(ApiResponse::success(
        Some(list),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}",
    tag = "admin-submissions",
    params(("id" = i64, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission found", body = ApiResponse<SubmissionResponseDto>),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn get_submission(
    State(state): State<SubmissionState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = state
        .service
        .get(id)
        .await
        .map_err(|e| e.with_message(messages::DETAIL_FAILED))?;

    Ok(Json(ApiResponse::success(
        Some(submission.into()),
        None,
        None,
    )))
}

/// Change the status of a submission
///
/// Any status may be set from any other status; only the status changes.
#[utoipa::path(
    patch,
    path = "/api/admin/submissions/{id}/status",
    tag = "admin-submissions",
    params(("id" = i64, Path, description = "Submission ID")),
    request_body = UpdateSubmissionStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn update_submission_status(
    State(state): State<SubmissionState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateSubmissionStatusDto>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = state
        .service
        .update_status(id, dto.status)
        .await
        .map_err(|e| e.with_message(messages::UPDATE_STATUS_FAILED))?;

    Ok(Json(ApiResponse::success(
        Some(submission.into()),
        Some(messages::status_updated(dto.status)),
        None,
    )))
}

/// Public link to the supporting letter of a submission
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}/file",
    tag = "admin-submissions",
    params(
        ("id" = i64, Path, description = "Submission ID"),
        DocumentQueryParams
    ),
    responses(
        (status = 200, description = "Public file link", body = ApiResponse<DocumentLinkDto>),
        (status = 404, description = "Submission or file not found")
    )
)]
pub async fn get_submission_document(
    State(state): State<SubmissionState>,
    Path(id): Path<i64>,
    AppQuery(params): AppQuery<DocumentQueryParams>,
) -> Result<Json<ApiResponse<DocumentLinkDto>>> {
    let disposition = params.disposition.unwrap_or_default();
    let link = state
        .service
        .document_link(id, disposition)
        .await
        .map_err(|e| e.with_message(document_failure_message(disposition)))?;

    Ok(Json(ApiResponse::success(Some(link), None, None)))
}

pub(crate) fn document_failure_message(disposition: DocumentDisposition) -> &'static str {
    match disposition {
        DocumentDisposition::View => messages::FILE_VIEW_FAILED,
        DocumentDisposition::Download => messages::FILE_DOWNLOAD_FAILED,
    }
}
