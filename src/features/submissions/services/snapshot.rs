use std::sync::Arc;

use crate::features::submissions::models::{Submission, SubmissionStatus};

/// One fetch of the record list, newest first.
///
/// The list is never mutated; the filtered view and the status counts are
/// derived from it on demand, so they always agree with each other.
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot {
    records: Arc<[Submission]>,
}

/// Number of records per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn get(&self, status: SubmissionStatus) -> usize {
        match status {
            SubmissionStatus::Pending => self.pending,
            SubmissionStatus::Processing => self.processing,
            SubmissionStatus::Approved => self.approved,
            SubmissionStatus::Rejected => self.rejected,
        }
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.pending + self.processing + self.approved + self.rejected
    }

    fn bump(&mut self, status: SubmissionStatus) {
        let slot = match status {
            SubmissionStatus::Pending => &mut self.pending,
            SubmissionStatus::Processing => &mut self.processing,
            SubmissionStatus::Approved => &mut self.approved,
            SubmissionStatus::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }
}

impl SubmissionSnapshot {
    pub fn new(records: Vec<Submission>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[cfg(test)]
    pub fn records(&self) -> &[Submission] {
        &self.records
    }

    pub fn find(&self, id: i64) -> Option<&Submission> {
        self.records.iter().find(|s| s.id == id)
    }

    /// Records whose company name, UTTP kind or district contains `term`,
    /// ignoring case. An empty term keeps everything.
    pub fn filter(&self, term: &str) -> Vec<&Submission> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|s| matches_term(s, &needle))
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.records
            .iter()
            .fold(StatusCounts::default(), |mut counts, s| {
                counts.bump(s.status);
                counts
            })
    }
}

fn matches_term(submission: &Submission, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);

    contains(&submission.nama_perusahaan)
        || contains(&submission.jenis_uttp)
        || submission.kecamatan.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_submission;

    fn snapshot() -> SubmissionSnapshot {
        SubmissionSnapshot::new(vec![
            sample_submission(
                3,
                "PT Sumber Makmur",
                "Pompa Ukur BBM",
                Some("Leles"),
                SubmissionStatus::Pending,
            ),
            sample_submission(
                2,
                "CV Timbang Jaya",
                "Timbangan Jembatan/AMP/Batching Plant",
                Some("Garut Kota"),
                SubmissionStatus::Approved,
            ),
            sample_submission(
                1,
                "Koperasi Tani",
                "Lainnya",
                None,
                SubmissionStatus::Pending,
            ),
        ])
    }

    fn ids(records: Vec<&Submission>) -> Vec<i64> {
        records.into_iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_empty_term_keeps_all_in_order() {
        assert_eq!(ids(snapshot().filter("")), vec![3, 2, 1]);
    }

    #[test]
    fn test_filter_matches_each_searchable_field() {
        let snapshot = snapshot();
        assert_eq!(ids(snapshot.filter("sumber")), vec![3]);
        assert_eq!(ids(snapshot.filter("BATCHING")), vec![2]);
        assert_eq!(ids(snapshot.filter("garut")), vec![2]);
        assert_eq!(ids(snapshot.filter("LAIN")), vec![1]);
    }

    #[test]
    fn test_term_is_matched_as_typed() {
        let snapshot = snapshot();
        assert!(snapshot.filter("  sumber").is_empty());
        assert_eq!(ids(snapshot.filter(" sumber")), vec![3]);
        assert!(snapshot.filter("   ").is_empty());
        assert_eq!(ids(snapshot.filter("sumber makmur")), vec![3]);
        assert!(snapshot.filter("tidak ada").is_empty());
    }

    #[test]
    fn test_filter_ignores_other_fields() {
        let mut record =
            sample_submission(9, "PT Lain", "Lainnya", None, SubmissionStatus::Pending);
        record.alamat_uttp = "Jl. Cikuray".to_string();
        record.nomor_spbu = Some("SPBU 34.44101".to_string());
        record.no_contact = Some("081200001111".to_string());
        let snapshot = SubmissionSnapshot::new(vec![record]);

        assert!(snapshot.filter("cikuray").is_empty());
        assert!(snapshot.filter("34.44101").is_empty());
        assert!(snapshot.filter("0812").is_empty());
        assert!(snapshot.filter("approved").is_empty());
    }

    #[test]
    fn test_status_counts_sum_to_len() {
        let snapshot = snapshot();
        let counts = snapshot.status_counts();

        assert_eq!(counts.pending, 2);
        assert_eq!(counts.approved, 1);
        assert_eq!(counts.processing, 0);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.total(), snapshot.records().len());
        assert_eq!(SubmissionSnapshot::empty().status_counts().total(), 0);
    }

    #[test]
    fn test_counts_ignore_search_term() {
        let snapshot = snapshot();
        assert_eq!(snapshot.filter("sumber").len(), 1);
        assert_eq!(snapshot.status_counts().total(), 3);
    }

    #[test]
    fn test_find() {
        let snapshot = snapshot();
        assert_eq!(
            snapshot.find(2).map(|s| s.nama_perusahaan.as_str()),
            Some("CV Timbang Jaya")
        );
        assert!(snapshot.find(42).is_none());
    }
}
