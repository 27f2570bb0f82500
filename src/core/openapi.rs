use utoipa::{Modify, OpenApi};

use crate::features::submissions::{dtos as submissions_dtos, handlers as submissions_handlers};
use crate::features::submissions::models as submissions_models;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Submissions (public)
        submissions_handlers::create_submission,
        submissions_handlers::get_form_options,
        // Submissions (admin)
        submissions_handlers::list_submissions,
        submissions_handlers::get_submission,
        submissions_handlers::update_submission_status,
        submissions_handlers::get_submission_document,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Submissions
            submissions_models::SubmissionStatus,
            submissions_models::JenisUttp,
            submissions_dtos::SubmitSubmissionDto,
            submissions_dtos::SubmissionResponseDto,
            submissions_dtos::SubmissionCreatedDto,
            submissions_dtos::SubmissionListDto,
            submissions_dtos::StatusCountDto,
            submissions_dtos::StatusOptionDto,
            submissions_dtos::FormOptionsDto,
            submissions_dtos::UpdateSubmissionStatusDto,
            submissions_dtos::DocumentDisposition,
            submissions_dtos::DocumentLinkDto,
            ApiResponse<submissions_dtos::SubmissionCreatedDto>,
            ApiResponse<submissions_dtos::SubmissionResponseDto>,
            ApiResponse<submissions_dtos::SubmissionListDto>,
            ApiResponse<submissions_dtos::FormOptionsDto>,
            ApiResponse<submissions_dtos::DocumentLinkDto>,
        )
    ),
    tags(
        (name = "submissions", description = "Tera ulang permit requests (public form)"),
        (name = "admin-submissions", description = "Review and status management of permit requests"),
    ),
    info(
        title = "Tera Ulang API",
        version = "0.1.0",
        description = "API documentation for the tera ulang permit service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_submission_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/submissions",
            "/api/submissions/options",
            "/api/admin/submissions",
            "/api/admin/submissions/{id}",
            "/api/admin/submissions/{id}/status",
            "/api/admin/submissions/{id}/file",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{}", expected);
        }
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Tera".to_string(),
            version: "2.0.0".to_string(),
            description: "Docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Tera");
        assert_eq!(doc.info.version, "2.0.0");
    }
}
