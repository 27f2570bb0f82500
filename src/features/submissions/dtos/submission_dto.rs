use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::core::error::{AppError, Result};
use crate::features::submissions::models::{
    is_known_kecamatan, is_known_spbu, spbu_codes, JenisUttp, NewSubmission, Submission,
    SubmissionStatus, KECAMATAN,
};
use crate::features::submissions::services::StatusCounts;
use crate::shared::constants::MAX_FILE_SIZE;

// =============================================================================
// FORM INPUT
// =============================================================================

/// Raw text fields of the submission form, exactly as typed.
///
/// Kept as strings so a rejected form can be rendered again with every value
/// in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionFormInput {
    pub nama_perusahaan: String,
    pub alamat_perusahaan: String,
    pub alamat_uttp: String,
    pub kecamatan: String,
    pub no_contact: String,
    pub jenis_uttp: String,
    pub nomor_spbu: String,
    pub jumlah_pompa: String,
    pub jumlah_nozzle: String,
    pub nomor_surat: String,
    pub tanggal_surat: String,
}

impl SubmissionFormInput {
    /// Store a multipart text field by its form name. Returns false for
    /// names the form does not have.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "namaPerusahaan" => &mut self.nama_perusahaan,
            "alamatPerusahaan" => &mut self.alamat_perusahaan,
            "alamatUttp" => &mut self.alamat_uttp,
            "kecamatan" => &mut self.kecamatan,
            "noContact" => &mut self.no_contact,
            "jenisUttp" => &mut self.jenis_uttp,
            "nomorSpbu" => &mut self.nomor_spbu,
            "jumlahPompa" => &mut self.jumlah_pompa,
            "jumlahNozzle" => &mut self.jumlah_nozzle,
            "nomorSurat" => &mut self.nomor_surat,
            "tanggalSurat" => &mut self.tanggal_surat,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Parse the typed values. Blank optional fields become `None`, blank
    /// counts become 0.
    pub fn to_dto(&self) -> Result<CreateSubmissionDto> {
        let jenis_uttp = match optional(&self.jenis_uttp) {
            Some(value) => Some(value.parse::<JenisUttp>().map_err(AppError::Validation)?),
            None => None,
        };

        let tanggal_surat = match optional(&self.tanggal_surat) {
            Some(value) => Some(NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                AppError::Validation("Tanggal surat tidak valid".to_string())
            })?),
            None => None,
        };

        Ok(CreateSubmissionDto {
            nama_perusahaan: self.nama_perusahaan.trim().to_string(),
            alamat_perusahaan: optional(&self.alamat_perusahaan),
            alamat_uttp: self.alamat_uttp.trim().to_string(),
            kecamatan: optional(&self.kecamatan),
            no_contact: optional(&self.no_contact),
            jenis_uttp,
            nomor_spbu: optional(&self.nomor_spbu),
            jumlah_pompa: parse_count(&self.jumlah_pompa, "Jumlah pompa")?,
            jumlah_nozzle: parse_count(&self.jumlah_nozzle, "Jumlah nozzle")?,
            nomor_surat: optional(&self.nomor_surat),
            tanggal_surat,
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_count(value: &str, label: &str) -> Result<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| AppError::Validation(format!("{} harus berupa angka", label)))
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn known_kecamatan(value: &str) -> std::result::Result<(), ValidationError> {
    if is_known_kecamatan(value) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_kecamatan"))
    }
}

fn known_spbu(value: &str) -> std::result::Result<(), ValidationError> {
    if is_known_spbu(value) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_spbu"))
    }
}

/// Parsed submission fields, validated before anything is uploaded
#[derive(Debug, Clone, Validate)]
pub struct CreateSubmissionDto {
    #[validate(custom(function = "not_blank", message = "Nama perusahaan wajib diisi"))]
    pub nama_perusahaan: String,
    pub alamat_perusahaan: Option<String>,
    #[validate(custom(function = "not_blank", message = "Alamat lokasi UTTP wajib diisi"))]
    pub alamat_uttp: String,
    #[validate(custom(function = "known_kecamatan", message = "Kecamatan tidak dikenal"))]
    pub kecamatan: Option<String>,
    #[validate(length(max = 100, message = "Nomor kontak maksimal 100 karakter"))]
    pub no_contact: Option<String>,
    #[validate(required(message = "Jenis UTTP wajib dipilih"))]
    pub jenis_uttp: Option<JenisUttp>,
    #[validate(custom(function = "known_spbu", message = "Nomor SPBU tidak dikenal"))]
    pub nomor_spbu: Option<String>,
    #[validate(range(min = 0, message = "Jumlah pompa tidak boleh negatif"))]
    pub jumlah_pompa: i32,
    #[validate(range(min = 0, message = "Jumlah nozzle tidak boleh negatif"))]
    pub jumlah_nozzle: i32,
    pub nomor_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
}

impl CreateSubmissionDto {
    pub fn into_new_submission(self, file_key: String) -> Result<NewSubmission> {
        let jenis_uttp = self
            .jenis_uttp
            .ok_or_else(|| AppError::Validation("Jenis UTTP wajib dipilih".to_string()))?;

        Ok(NewSubmission {
            nama_perusahaan: self.nama_perusahaan,
            alamat_perusahaan: self.alamat_perusahaan,
            alamat_uttp: self.alamat_uttp,
            kecamatan: self.kecamatan,
            no_contact: self.no_contact,
            jenis_uttp: jenis_uttp.as_str().to_string(),
            nomor_spbu: self.nomor_spbu,
            jumlah_pompa: self.jumlah_pompa,
            jumlah_nozzle: self.jumlah_nozzle,
            nomor_surat: self.nomor_surat,
            tanggal_surat: self.tanggal_surat,
            file_surat_url: Some(file_key),
        })
    }
}

/// The uploaded supporting letter
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Multipart body of `POST /api/submissions` (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct SubmitSubmissionDto {
    #[schema(example = "PT Sumber Makmur")]
    pub nama_perusahaan: String,
    pub alamat_perusahaan: Option<String>,
    pub alamat_uttp: String,
    #[schema(example = "Garut Kota")]
    pub kecamatan: Option<String>,
    #[schema(example = "081234567890")]
    pub no_contact: Option<String>,
    #[schema(example = "Pompa Ukur BBM")]
    pub jenis_uttp: String,
    #[schema(example = "SPBU 34.44101")]
    pub nomor_spbu: Option<String>,
    pub jumlah_pompa: Option<i32>,
    pub jumlah_nozzle: Option<i32>,
    pub nomor_surat: Option<String>,
    #[schema(example = "2025-01-31")]
    pub tanggal_surat: Option<String>,
    /// Supporting letter (.pdf, .doc, .docx), at most 10 MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file_surat: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
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
    pub file_surat_url: Option<String>,
    pub status: SubmissionStatus,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponseDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            nama_perusahaan: s.nama_perusahaan,
            alamat_perusahaan: s.alamat_perusahaan,
            alamat_uttp: s.alamat_uttp,
            kecamatan: s.kecamatan,
            no_contact: s.no_contact,
            jenis_uttp: s.jenis_uttp,
            nomor_spbu: s.nomor_spbu,
            jumlah_pompa: s.jumlah_pompa,
            jumlah_nozzle: s.jumlah_nozzle,
            nomor_surat: s.nomor_surat,
            tanggal_surat: s.tanggal_surat,
            file_surat_url: s.file_surat_url,
            status_label: s.status.label().to_string(),
            status: s.status,
            created_at: s.created_at,
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionCreatedDto {
    pub submission: SubmissionResponseDto,
    /// Where the client should navigate next
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountDto {
    pub status: SubmissionStatus,
    pub label: String,
    pub count: usize,
}

/// One entry per status, in display order
pub fn status_count_dtos(counts: &StatusCounts) -> Vec<StatusCountDto> {
    SubmissionStatus::ALL
        .into_iter()
        .map(|status| StatusCountDto {
            status,
            label: status.label().to_string(),
            count: counts.get(status),
        })
        .collect()
}

/// Admin listing: counts over all records plus the filtered items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionListDto {
    pub counts: Vec<StatusCountDto>,
    pub items: Vec<SubmissionResponseDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusOptionDto {
    pub value: SubmissionStatus,
    pub label: String,
}

/// Choice lists for building the submission form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormOptionsDto {
    pub kecamatan: Vec<String>,
    pub jenis_uttp: Vec<String>,
    pub nomor_spbu: Vec<String>,
    pub statuses: Vec<StatusOptionDto>,
    pub max_file_size: usize,
}

impl FormOptionsDto {
    pub fn build() -> Self {
        Self {
            kecamatan: KECAMATAN.iter().map(|k| k.to_string()).collect(),
            jenis_uttp: JenisUttp::ALL
                .iter()
                .map(|j| j.as_str().to_string())
                .collect(),
            nomor_spbu: spbu_codes(),
            statuses: SubmissionStatus::ALL
                .into_iter()
                .map(|value| StatusOptionDto {
                    value,
                    label: value.label().to_string(),
                })
                .collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SubmissionQueryParams {
    /// Case-insensitive match on company name, UTTP kind or district
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSubmissionStatusDto {
    pub status: SubmissionStatus,
}

/// How the supporting letter should be handed to the operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentDisposition {
    #[default]
    View,
    Download,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DocumentQueryParams {
    pub disposition: Option<DocumentDisposition>,
}

/// Public link to a stored letter, derived per request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentLinkDto {
    pub url: String,
    pub filename: String,
    pub disposition: DocumentDisposition,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::describe_errors;

    fn filled_input() -> SubmissionFormInput {
        let mut input = SubmissionFormInput::default();
        input.set("namaPerusahaan", "PT Sumber Makmur".to_string());
        input.set("alamatUttp", "Jl. Cimanuk No. 1".to_string());
        input.set("jenisUttp", "Pompa Ukur BBM".to_string());
        input
    }

    #[test]
    fn test_set_ignores_unknown_fields() {
        let mut input = SubmissionFormInput::default();
        assert!(input.set("kecamatan", "Leles".to_string()));
        assert!(!input.set("status", "Approved".to_string()));
        assert_eq!(input.kecamatan, "Leles");
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut input = filled_input();
        input.set("alamatPerusahaan", "   ".to_string());
        input.set("nomorSpbu", String::new());

        let dto = input.to_dto().unwrap();
        assert_eq!(dto.alamat_perusahaan, None);
        assert_eq!(dto.nomor_spbu, None);
        assert_eq!(dto.jumlah_pompa, 0);
        assert_eq!(dto.jumlah_nozzle, 0);
        assert_eq!(dto.jenis_uttp, Some(JenisUttp::PompaUkurBbm));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_counts_and_date_are_parsed() {
        let mut input = filled_input();
        input.set("jumlahPompa", "4".to_string());
        input.set("jumlahNozzle", "8".to_string());
        input.set("tanggalSurat", "2025-01-31".to_string());

        let dto = input.to_dto().unwrap();
        assert_eq!(dto.jumlah_pompa, 4);
        assert_eq!(dto.jumlah_nozzle, 8);
        assert_eq!(dto.tanggal_surat, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_invalid_number_and_date_are_rejected() {
        let mut input = filled_input();
        input.set("jumlahPompa", "empat".to_string());
        assert!(matches!(input.to_dto(), Err(AppError::Validation(_))));

        let mut input = filled_input();
        input.set("tanggalSurat", "31/01/2025".to_string());
        assert!(matches!(input.to_dto(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_required_fields_are_validated() {
        let dto = SubmissionFormInput::default().to_dto().unwrap();
        let errors = dto.validate().unwrap_err();
        let message = describe_errors(&errors);

        assert!(message.contains("Nama perusahaan wajib diisi"));
        assert!(message.contains("Alamat lokasi UTTP wajib diisi"));
        assert!(message.contains("Jenis UTTP wajib dipilih"));
    }

    #[test]
    fn test_contact_is_free_text() {
        for contact in ["(0262) 231234", "Budi 0812-3456-7890", "+62 812 3456 7890"] {
            let mut input = filled_input();
            input.set("noContact", format!("  {}  ", contact));
            let dto = input.to_dto().unwrap();

            assert_eq!(dto.no_contact.as_deref(), Some(contact));
            assert!(dto.validate().is_ok());
        }

        let mut input = filled_input();
        input.set("noContact", "0".repeat(101));
        let message = describe_errors(&input.to_dto().unwrap().validate().unwrap_err());
        assert!(message.contains("Nomor kontak maksimal 100 karakter"));
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        let mut input = filled_input();
        input.set("jumlahNozzle", "-1".to_string());
        let dto = input.to_dto().unwrap();

        let errors = describe_errors(&dto.validate().unwrap_err());
        assert!(errors.contains("Jumlah nozzle tidak boleh negatif"));
    }

    #[test]
    fn test_unknown_choice_values_are_rejected() {
        let mut input = filled_input();
        input.set("kecamatan", "Bandung".to_string());
        input.set("nomorSpbu", "SPBU 99.99999".to_string());
        let dto = input.to_dto().unwrap();

        let message = describe_errors(&dto.validate().unwrap_err());
        assert!(message.contains("Kecamatan tidak dikenal"));
        assert!(message.contains("Nomor SPBU tidak dikenal"));

        let mut input = filled_input();
        input.set("jenisUttp", "Meteran Air".to_string());
        assert!(matches!(input.to_dto(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_form_options() {
        let options = FormOptionsDto::build();
        assert_eq!(options.kecamatan.len(), 35);
        assert_eq!(options.jenis_uttp.len(), 3);
        assert_eq!(options.nomor_spbu.len(), 24);
        assert_eq!(options.statuses[0].label, "Menunggu");
        assert_eq!(options.max_file_size, 10 * 1024 * 1024);
    }
}
