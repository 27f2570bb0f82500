pub mod catalog;
pub mod submission;

pub use catalog::{is_known_kecamatan, is_known_spbu, spbu_codes, JenisUttp, KECAMATAN};
pub use submission::{NewSubmission, Submission, SubmissionStatus};
