pub mod page_handler;
pub mod submission_handler;

pub use page_handler::{admin_page, document_page, form_page, submit_form_page, update_status_page};
pub use submission_handler::{
    __path_create_submission, __path_get_form_options, __path_get_submission,
    __path_get_submission_document, __path_list_submissions, __path_update_submission_status,
    create_submission, get_form_options, get_submission, get_submission_document, list_submissions,
    update_submission_status, SubmissionState,
};
