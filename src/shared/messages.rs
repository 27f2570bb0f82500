//! Operator-facing notification texts.
//!
//! These strings are shown verbatim in toasts and API messages; UI parity
//! tests compare against them, so keep them byte-for-byte.

use crate::core::error::AppError;

pub const SUBMIT_SUCCESS: &str = "Data tera ulang berhasil disimpan!";
pub const LOAD_FAILED: &str = "Gagal memuat data permohonan";
pub const UPDATE_STATUS_FAILED: &str = "Gagal mengubah status";
pub const FILE_TOO_LARGE: &str = "Ukuran file maksimal 10 MB";
pub const FILE_VIEW_FAILED: &str = "File tidak dapat diakses";
pub const FILE_DOWNLOAD_FAILED: &str = "File tidak dapat didownload";
pub const FILE_REQUIRED: &str = "File surat permohonan wajib diunggah";
pub const FILE_TYPE_NOT_ALLOWED: &str = "Format file harus PDF, DOC, atau DOCX";
pub const DETAIL_FAILED: &str = "Gagal memuat detail permohonan";

pub fn status_updated(status: impl std::fmt::Display) -> String {
    format!("Status berhasil diubah ke {}", status)
}

/// "Gagal mengirim pengajuan: ..." with the client-safe reason appended
pub fn submit_failed(err: &AppError) -> String {
    format!("Gagal mengirim pengajuan: {}", err.public_message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_updated_uses_raw_value() {
        assert_eq!(
            status_updated("Approved"),
            "Status berhasil diubah ke Approved"
        );
    }

    #[test]
    fn test_submit_failed_appends_reason() {
        let err = AppError::Validation("namaPerusahaan wajib diisi".to_string());
        assert_eq!(
            submit_failed(&err),
            "Gagal mengirim pengajuan: namaPerusahaan wajib diisi"
        );
    }
}
