//! View models for the submission pages.

use serde::{Deserialize, Serialize};

use crate::features::submissions::dtos::{
    status_count_dtos, DocumentDisposition, FormOptionsDto, StatusOptionDto, SubmissionFormInput,
};
use crate::features::submissions::models::{Submission, SubmissionStatus};
use crate::features::submissions::services::SubmissionSnapshot;
use crate::shared::constants::{ADMIN_PAGE_PATH, FORM_PAGE_PATH, MAX_FILE_SIZE};
use crate::shared::pages::{format_date, format_timestamp, or_not_available};
use crate::shared::types::{Toast, ToastKind};

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Detail,
    Status,
}

impl DialogKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "detail" => Some(DialogKind::Detail),
            "status" => Some(DialogKind::Status),
            _ => None,
        }
    }
}

/// Query string of the admin listing page.
///
/// Kept as raw strings: a malformed value only closes the dialog or drops
/// the toast, the page itself still renders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPageQuery {
    pub search: Option<String>,
    pub dialog: Option<String>,
    pub id: Option<String>,
    /// Preselected value in the status dialog
    pub status: Option<String>,
    pub toast_kind: Option<String>,
    pub toast: Option<String>,
}

impl AdminPageQuery {
    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    pub fn dialog_kind(&self) -> Option<DialogKind> {
        self.dialog.as_deref().and_then(DialogKind::parse)
    }

    pub fn record_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }

    pub fn pending_status(&self) -> Option<SubmissionStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn toast(&self) -> Option<Toast> {
        let kind = match self.toast_kind.as_deref() {
            Some("error") => Some(ToastKind::Error),
            Some("success") => Some(ToastKind::Success),
            _ => None,
        };
        Toast::from_query(kind, self.toast.as_deref())
    }
}

/// Query string of the page file route; anything but `download` opens the file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPageQuery {
    pub disposition: Option<String>,
}

impl DocumentPageQuery {
    pub fn disposition(&self) -> DocumentDisposition {
        match self.disposition.as_deref() {
            Some("download") => DocumentDisposition::Download,
            _ => DocumentDisposition::View,
        }
    }
}

/// Form body of the status dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Listing URL carrying a search term and a toast across a redirect
pub fn listing_url(search: Option<&str>, toast: &Toast) -> String {
    let mut url = format!("{}?", ADMIN_PAGE_PATH);
    if let Some(term) = search.filter(|t| !t.is_empty()) {
        url.push_str(&format!("search={}&", urlencoding::encode(term)));
    }
    url.push_str(&toast.to_query());
    url
}

/// Listing URL that reopens the detail dialog of `id` with a toast
pub fn detail_url(id: i64, toast: &Toast) -> String {
    format!(
        "{}?dialog=detail&id={}&{}",
        ADMIN_PAGE_PATH,
        id,
        toast.to_query()
    )
}

// =============================================================================
// DIALOG
// =============================================================================

/// Which dialog the listing page shows, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdminDialog<'a> {
    Closed,
    Detail(&'a Submission),
    UpdateStatus {
        record: &'a Submission,
        pending: Option<SubmissionStatus>,
    },
}

impl<'a> AdminDialog<'a> {
    /// Dialog requested by the query, against records of this snapshot.
    /// Unknown ids close the dialog.
    pub fn resolve(snapshot: &'a SubmissionSnapshot, query: &AdminPageQuery) -> Self {
        let (Some(kind), Some(id)) = (query.dialog_kind(), query.record_id()) else {
            return AdminDialog::Closed;
        };
        let Some(record) = snapshot.find(id) else {
            return AdminDialog::Closed;
        };

        match kind {
            DialogKind::Detail => AdminDialog::Detail(record),
            DialogKind::Status => AdminDialog::UpdateStatus {
                record,
                pending: query.pending_status(),
            },
        }
    }

    pub fn view(&self, search: &str) -> Option<DialogView> {
        match *self {
            AdminDialog::Closed => None,
            AdminDialog::Detail(record) => Some(DialogView::Detail {
                record: SubmissionDetailView::from(record),
            }),
            AdminDialog::UpdateStatus { record, pending } => Some(DialogView::UpdateStatus {
                record: SubmissionDetailView::from(record),
                pending: pending.unwrap_or(record.status),
                options: status_options(),
                search: search.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogView {
    Detail {
        record: SubmissionDetailView,
    },
    UpdateStatus {
        record: SubmissionDetailView,
        /// Preselected option; the current status until one is picked
        pending: SubmissionStatus,
        options: Vec<StatusOptionDto>,
        search: String,
    },
}

fn status_options() -> Vec<StatusOptionDto> {
    SubmissionStatus::ALL
        .into_iter()
        .map(|value| StatusOptionDto {
            value,
            label: value.label().to_string(),
        })
        .collect()
}

// =============================================================================
// RECORDS
// =============================================================================

/// Badge style per status
pub fn status_badge(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Pending => "secondary",
        SubmissionStatus::Processing => "outline",
        SubmissionStatus::Approved => "default",
        SubmissionStatus::Rejected => "destructive",
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionRowView {
    pub id: i64,
    pub nama_perusahaan: String,
    pub no_contact: String,
    pub jenis_uttp: String,
    pub kecamatan: String,
    pub nomor_spbu: String,
    pub created_at: String,
    pub status: SubmissionStatus,
    pub status_label: &'static str,
    pub badge: &'static str,
}

impl From<&Submission> for SubmissionRowView {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            nama_perusahaan: s.nama_perusahaan.clone(),
            no_contact: or_not_available(s.no_contact.as_deref()),
            jenis_uttp: s.jenis_uttp.clone(),
            kecamatan: or_not_available(s.kecamatan.as_deref()),
            nomor_spbu: or_not_available(s.nomor_spbu.as_deref()),
            created_at: format_timestamp(s.created_at),
            status: s.status,
            status_label: s.status.label(),
            badge: status_badge(s.status),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetailView {
    pub id: i64,
    pub nama_perusahaan: String,
    pub alamat_perusahaan: String,
    pub alamat_uttp: String,
    pub kecamatan: String,
    pub no_contact: String,
    pub jenis_uttp: String,
    pub nomor_spbu: String,
    pub jumlah_pompa: i32,
    pub jumlah_nozzle: i32,
    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub created_at: String,
    pub status: SubmissionStatus,
    pub status_label: &'static str,
    pub badge: &'static str,
    pub has_file: bool,
    pub file_view_url: String,
    pub file_download_url: String,
}

impl From<&Submission> for SubmissionDetailView {
    fn from(s: &Submission) -> Self {
        let file_url = format!("{}/{}/file", ADMIN_PAGE_PATH, s.id);
        Self {
            id: s.id,
            nama_perusahaan: s.nama_perusahaan.clone(),
            alamat_perusahaan: or_not_available(s.alamat_perusahaan.as_deref()),
            alamat_uttp: s.alamat_uttp.clone(),
            kecamatan: or_not_available(s.kecamatan.as_deref()),
            no_contact: or_not_available(s.no_contact.as_deref()),
            jenis_uttp: s.jenis_uttp.clone(),
            nomor_spbu: or_not_available(s.nomor_spbu.as_deref()),
            jumlah_pompa: s.jumlah_pompa.unwrap_or(0),
            jumlah_nozzle: s.jumlah_nozzle.unwrap_or(0),
            nomor_surat: or_not_available(s.nomor_surat.as_deref()),
            tanggal_surat: s
                .tanggal_surat
                .map(format_date)
                .unwrap_or_else(|| or_not_available(None)),
            created_at: format_timestamp(s.created_at),
            status: s.status,
            status_label: s.status.label(),
            badge: status_badge(s.status),
            has_file: s.document_key().is_some(),
            file_view_url: format!("{}?disposition=view", file_url),
            file_download_url: format!("{}?disposition=download", file_url),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusCardView {
    pub label: &'static str,
    pub count: usize,
    pub status: SubmissionStatus,
}

// =============================================================================
// PAGES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct AdminPageView {
    pub page_title: &'static str,
    pub action: &'static str,
    pub search: String,
    /// `search`, percent-encoded for links
    pub search_query: String,
    pub cards: Vec<StatusCardView>,
    pub rows: Vec<SubmissionRowView>,
    pub dialog: Option<DialogView>,
    pub toast: Option<Toast>,
}

impl AdminPageView {
    pub fn build(
        snapshot: &SubmissionSnapshot,
        query: &AdminPageQuery,
        toast: Option<Toast>,
    ) -> Self {
        let search = query.search_term();
        let counts = snapshot.status_counts();

        Self {
            page_title: "Data Permohonan Tera Ulang",
            action: ADMIN_PAGE_PATH,
            search: search.to_string(),
            search_query: urlencoding::encode(search).into_owned(),
            cards: status_count_dtos(&counts)
                .into_iter()
                .map(|c| StatusCardView {
                    label: c.status.label(),
                    count: c.count,
                    status: c.status,
                })
                .collect(),
            rows: snapshot
                .filter(search)
                .into_iter()
                .map(SubmissionRowView::from)
                .collect(),
            dialog: AdminDialog::resolve(snapshot, query).view(search),
            toast,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormPageView {
    pub page_title: &'static str,
    pub action: &'static str,
    pub input: SubmissionFormInput,
    pub options: FormOptionsDto,
    pub max_file_mb: usize,
    pub toast: Option<Toast>,
}

impl FormPageView {
    pub fn build(input: SubmissionFormInput, toast: Option<Toast>) -> Self {
        Self {
            page_title: "Form Pengajuan Tera Ulang",
            action: FORM_PAGE_PATH,
            input,
            options: FormOptionsDto::build(),
            max_file_mb: MAX_FILE_SIZE / (1024 * 1024),
            toast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_submission;
    use chrono::NaiveDate;

    fn snapshot() -> SubmissionSnapshot {
        SubmissionSnapshot::new(vec![
            sample_submission(
                2,
                "PT Sumber Makmur",
                "Pompa Ukur BBM",
                Some("Leles"),
                SubmissionStatus::Processing,
            ),
            sample_submission(
                1,
                "CV Timbang Jaya",
                "Lainnya",
                None,
                SubmissionStatus::Pending,
            ),
        ])
    }

    fn query(dialog: Option<&str>, id: Option<&str>) -> AdminPageQuery {
        AdminPageQuery {
            dialog: dialog.map(str::to_string),
            id: id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_dialog() {
        let snapshot = snapshot();

        assert_eq!(
            AdminDialog::resolve(&snapshot, &query(None, None)),
            AdminDialog::Closed
        );
        assert_eq!(
            AdminDialog::resolve(&snapshot, &query(Some("detail"), Some("99"))),
            AdminDialog::Closed
        );
        assert!(matches!(
            AdminDialog::resolve(&snapshot, &query(Some("detail"), Some("2"))),
            AdminDialog::Detail(record) if record.id == 2
        ));

        let mut status_query = query(Some("status"), Some("1"));
        status_query.status = Some("Rejected".to_string());
        assert!(matches!(
            AdminDialog::resolve(&snapshot, &status_query),
            AdminDialog::UpdateStatus { record, pending: Some(SubmissionStatus::Rejected) } if record.id == 1
        ));
    }

    #[test]
    fn test_malformed_query_closes_dialog() {
        let snapshot = snapshot();

        assert_eq!(
            AdminDialog::resolve(&snapshot, &query(Some("foo"), Some("2"))),
            AdminDialog::Closed
        );
        assert_eq!(
            AdminDialog::resolve(&snapshot, &query(Some("detail"), Some("dua"))),
            AdminDialog::Closed
        );

        let mut status_query = query(Some("status"), Some("2"));
        status_query.status = Some("pending".to_string());
        assert!(matches!(
            AdminDialog::resolve(&snapshot, &status_query),
            AdminDialog::UpdateStatus { record, pending: None } if record.id == 2
        ));

        status_query.toast_kind = Some("warning".to_string());
        status_query.toast = Some("Halo".to_string());
        assert_eq!(status_query.toast(), Some(Toast::success("Halo")));
    }

    #[test]
    fn test_document_page_query_defaults_to_view() {
        let query = |d: Option<&str>| DocumentPageQuery {
            disposition: d.map(str::to_string),
        };
        assert_eq!(query(None).disposition(), DocumentDisposition::View);
        assert_eq!(
            query(Some("unduh")).disposition(),
            DocumentDisposition::View
        );
        assert_eq!(
            query(Some("download")).disposition(),
            DocumentDisposition::Download
        );
    }

    #[test]
    fn test_detail_view_placeholders() {
        let mut record = sample_submission(1, "PT A", "Lainnya", None, SubmissionStatus::Pending);
        let view = SubmissionDetailView::from(&record);
        assert_eq!(view.kecamatan, "N/A");
        assert_eq!(view.tanggal_surat, "N/A");
        assert_eq!(view.jumlah_pompa, 0);
        assert!(!view.has_file);

        record.tanggal_surat = NaiveDate::from_ymd_opt(2025, 2, 14);
        record.file_surat_url = Some("public/1_surat.pdf".to_string());
        let view = SubmissionDetailView::from(&record);
        assert_eq!(view.tanggal_surat, "14/02/2025");
        assert!(view.has_file);
        assert_eq!(
            view.file_download_url,
            "/admin/perpanjang/1/file?disposition=download"
        );
    }

    #[test]
    fn test_admin_page_counts_cover_whole_snapshot() {
        let snapshot = snapshot();
        let mut query = AdminPageQuery::default();
        query.search = Some("sumber".to_string());

        let page = AdminPageView::build(&snapshot, &query, None);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.cards.iter().map(|c| c.count).sum::<usize>(), 2);
        assert_eq!(page.cards[0].label, "Menunggu");
    }

    #[test]
    fn test_listing_url() {
        let toast = Toast::error("Gagal mengubah status");
        assert_eq!(
            listing_url(Some("pt sumber"), &toast),
            "/admin/perpanjang?search=pt%20sumber&toast_kind=error&toast=Gagal%20mengubah%20status"
        );
        assert_eq!(
            detail_url(4, &Toast::error("File tidak dapat diakses")),
            "/admin/perpanjang?dialog=detail&id=4&toast_kind=error&toast=File%20tidak%20dapat%20diakses"
        );
    }
}
