use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::submissions::models::{NewSubmission, Submission, SubmissionStatus};

const SUBMISSION_COLUMNS: &str = "id, nama_perusahaan, alamat_perusahaan, alamat_uttp, \
     kecamatan, no_contact, jenis_uttp, nomor_spbu, jumlah_pompa, jumlah_nozzle, \
     nomor_surat, tanggal_surat, file_surat_url, status, created_at";

/// Persistence for permit requests
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// All records, newest first
    async fn list_recent(&self) -> Result<Vec<Submission>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>>;

    /// Insert with status `Pending`, returning the stored row
    async fn insert(&self, submission: NewSubmission) -> Result<Submission>;

    /// Change only the status column. `None` when the id does not exist.
    async fn update_status(&self, id: i64, status: SubmissionStatus) -> Result<Option<Submission>>;
}

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn list_recent(&self) -> Result<Vec<Submission>> {
        let sql = format!(
            "SELECT {} FROM pengajuan_tera ORDER BY created_at DESC, id DESC",
            SUBMISSION_COLUMNS
        );

        let rows = sqlx::query_as::<_, Submission>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>> {
        let sql = format!(
            "SELECT {} FROM pengajuan_tera WHERE id = $1",
            SUBMISSION_COLUMNS
        );

        let row = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn insert(&self, submission: NewSubmission) -> Result<Submission> {
        let sql = format!(
            r#"
            INSERT INTO pengajuan_tera (
                nama_perusahaan, alamat_perusahaan, alamat_uttp, kecamatan, no_contact,
                jenis_uttp, nomor_spbu, jumlah_pompa, jumlah_nozzle, nomor_surat,
                tanggal_surat, file_surat_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        );

        let row = sqlx::query_as::<_, Submission>(&sql)
            .bind(&submission.nama_perusahaan)
            .bind(&submission.alamat_perusahaan)
            .bind(&submission.alamat_uttp)
            .bind(&submission.kecamatan)
            .bind(&submission.no_contact)
            .bind(&submission.jenis_uttp)
            .bind(&submission.nomor_spbu)
            .bind(submission.jumlah_pompa)
            .bind(submission.jumlah_nozzle)
            .bind(&submission.nomor_surat)
            .bind(submission.tanggal_surat)
            .bind(&submission.file_surat_url)
            .bind(SubmissionStatus::Pending)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update_status(&self, id: i64, status: SubmissionStatus) -> Result<Option<Submission>> {
        let sql = format!(
            "UPDATE pengajuan_tera SET status = $2 WHERE id = $1 RETURNING {}",
            SUBMISSION_COLUMNS
        );

        let row = sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
