use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::submissions::dtos::{
    CreateSubmissionDto, DocumentDisposition, DocumentLinkDto, UploadedDocument,
};
use crate::features::submissions::models::{Submission, SubmissionStatus};
use crate::features::submissions::repositories::SubmissionStore;
use crate::features::submissions::services::SubmissionSnapshot;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::MAX_FILE_SIZE;
use crate::shared::messages;
use crate::shared::validation::{
    describe_errors, file_extension, is_allowed_document, timestamped_object_name,
};

/// A stored letter fetched for download
#[derive(Debug)]
pub struct DocumentContent {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// Service for permit requests and their supporting letters
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn SubmissionStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    /// Validate the form, upload the letter, then insert the record as `Pending`.
    ///
    /// Nothing touches storage until the fields and the file have passed
    /// every check. If the insert fails after a successful upload, the
    /// uploaded object is deleted again on a best-effort basis.
    pub async fn submit(
        &self,
        dto: CreateSubmissionDto,
        document: Option<UploadedDocument>,
    ) -> Result<Submission> {
        dto.validate()
            .map_err(|e| AppError::Validation(describe_errors(&e)))?;

        let document = document
            .filter(|d| !d.data.is_empty())
            .ok_or_else(|| AppError::Validation(messages::FILE_REQUIRED.to_string()))?;
        check_document(&document)?;

        let object_name =
            timestamped_object_name(Utc::now().timestamp_millis(), &document.file_name);
        let key = self
            .storage
            .upload(&object_name, document.data, &document.content_type)
            .await?;
        debug!("Uploaded supporting letter to {}", key);

        let new_submission = dto.into_new_submission(key.clone())?;
        match self.store.insert(new_submission).await {
            Ok(submission) => {
                info!(
                    "Submission {} created for {}",
                    submission.id, submission.nama_perusahaan
                );
                Ok(submission)
            }
            Err(e) => {
                self.discard_orphan(&key).await;
                Err(e)
            }
        }
    }

    async fn discard_orphan(&self, key: &str) {
        match self.storage.delete(key).await {
            Ok(()) => debug!("Removed orphaned upload {}", key),
            Err(e) => warn!("Failed to remove orphaned upload {}: {}", key, e),
        }
    }

    /// Fetch every record once, newest first
    pub async fn load_snapshot(&self) -> Result<SubmissionSnapshot> {
        let records = self.store.list_recent().await?;
        debug!("Loaded {} submissions", records.len());
        Ok(SubmissionSnapshot::new(records))
    }

    pub async fn get(&self, id: i64) -> Result<Submission> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Set the status of one record; other fields are left as they are
    pub async fn update_status(&self, id: i64, status: SubmissionStatus) -> Result<Submission> {
        let submission = self
            .store
            .update_status(id, status)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!("Submission {} status changed to {}", id, status);
        Ok(submission)
    }

    /// Public link to the letter of a record, derived from its stored key
    pub async fn document_link(
        &self,
        id: i64,
        disposition: DocumentDisposition,
    ) -> Result<DocumentLinkDto> {
        let submission = self.get(id).await?;
        let key = stored_key(&submission)?;
        let url = self.storage.public_url(key)?;

        Ok(DocumentLinkDto {
            url,
            filename: download_filename(&submission.nama_perusahaan),
            disposition,
        })
    }

    /// Bytes of the letter of a record, with its download filename
    pub async fn download_document(&self, id: i64) -> Result<DocumentContent> {
        let submission = self.get(id).await?;
        let key = stored_key(&submission)?;
        let data = self.storage.download(key).await?;

        Ok(DocumentContent {
            filename: download_filename(&submission.nama_perusahaan),
            content_type: content_type_for(key),
            data,
        })
    }
}

fn check_document(document: &UploadedDocument) -> Result<()> {
    if document.data.len() > MAX_FILE_SIZE {
        return Err(AppError::PayloadTooLarge(
            messages::FILE_TOO_LARGE.to_string(),
        ));
    }

    if !is_allowed_document(&document.file_name) {
        return Err(AppError::Validation(
            messages::FILE_TYPE_NOT_ALLOWED.to_string(),
        ));
    }

    Ok(())
}

fn stored_key(submission: &Submission) -> Result<&str> {
    submission.document_key().ok_or_else(|| {
        AppError::NotFound(format!(
            "Permohonan {} tidak memiliki file surat",
            submission.id
        ))
    })
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Permohonan {} tidak ditemukan", id))
}

/// `surat_{company name}.pdf`
pub fn download_filename(nama_perusahaan: &str) -> String {
    format!("surat_{}.pdf", nama_perusahaan)
}

fn content_type_for(key: &str) -> &'static str {
    match file_extension(key).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}
