pub mod snapshot;
pub mod submission_service;

pub use snapshot::{StatusCounts, SubmissionSnapshot};
pub use submission_service::SubmissionService;
