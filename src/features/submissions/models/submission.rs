use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Lifecycle of a permit request, matching the `submission_status` database enum.
///
/// Every record starts as `Pending`. An operator may move a record to any
/// other status; nothing changes status automatically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "submission_status")]
pub enum SubmissionStatus {
    Pending,
    Processing,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    /// Display order used by summary cards and the status selector
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Processing,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Processing => "Processing",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// Indonesian label shown on badges and cards
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Menunggu",
            SubmissionStatus::Processing => "Diproses",
            SubmissionStatus::Approved => "Disetujui",
            SubmissionStatus::Rejected => "Ditolak",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Status '{}' tidak dikenal", s))
    }
}

/// Database model for `pengajuan_tera`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Submission {
    pub id: i64,
    pub nama_perusahaan: String,
    pub alamat_perusahaan: Option<String>,
    pub alamat_uttp: String,
    pub kecamatan: Option<String>,
    pub no_contact: Option<String>,
    pub jenis_uttp: String,
    pub nomor_spbu: Option<String>,
    pub jumlah_pompa: Option<i32>,
    pub jumlah_nozzle: Option<i32>,
    pub nomor_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    /// Storage object key of the supporting letter, not a URL
    pub file_surat_url: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Stored object key, if the record has a usable one
    pub fn document_key(&self) -> Option<&str> {
        self.file_surat_url
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Data for inserting a new record. There is no status field: the insert
/// always writes `Pending`.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub nama_perusahaan: String,
    pub alamat_perusahaan: Option<String>,
    pub alamat_uttp: String,
    pub kecamatan: Option<String>,
    pub no_contact: Option<String>,
    pub jenis_uttp: String,
    pub nomor_spbu: Option<String>,
    pub jumlah_pompa: i32,
    pub jumlah_nozzle: i32,
    pub nomor_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    pub file_surat_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in SubmissionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubmissionStatus>(), Ok(status));
        }
        assert!("pending".parse::<SubmissionStatus>().is_err());
        assert!("Unknown".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_as_stored_value() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Processing).unwrap(),
            "\"Processing\""
        );
        let unknown = serde_json::from_str::<SubmissionStatus>("\"Selesai\"");
        assert!(unknown.is_err());
    }

    #[test]
    fn test_status_labels() {
        let labels: Vec<&str> = SubmissionStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Menunggu", "Diproses", "Disetujui", "Ditolak"]);
    }
}
