use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::{faker::company::en::CompanyName, Fake};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::error::{AppError, Result};
use crate::features::submissions::dtos::UploadedDocument;
use crate::features::submissions::models::{NewSubmission, Submission, SubmissionStatus};
use crate::features::submissions::repositories::SubmissionStore;
use crate::features::submissions::{self, SubmissionService};
use crate::modules::storage::{build_public_url, ObjectStorage};

const TEST_STORAGE_ENDPOINT: &str = "http://storage.test";
const TEST_BUCKET: &str = "uploads";
const TEST_PREFIX: &str = "public";

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Record with the given searchable fields; higher ids are newer
pub fn sample_submission(
    id: i64,
    nama_perusahaan: &str,
    jenis_uttp: &str,
    kecamatan: Option<&str>,
    status: SubmissionStatus,
) -> Submission {
    Submission {
        id,
        nama_perusahaan: nama_perusahaan.to_string(),
        alamat_perusahaan: None,
        alamat_uttp: "Jl. Cimanuk No. 1".to_string(),
        kecamatan: kecamatan.map(str::to_string),
        no_contact: None,
        jenis_uttp: jenis_uttp.to_string(),
        nomor_spbu: None,
        jumlah_pompa: None,
        jumlah_nozzle: None,
        nomor_surat: None,
        tanggal_surat: None,
        file_surat_url: None,
        status,
        created_at: base_time() + Duration::minutes(id),
    }
}

/// Record with a generated company name
pub fn fake_submission(id: i64, status: SubmissionStatus) -> Submission {
    let name: String = CompanyName().fake();
    sample_submission(id, &name, "Pompa Ukur BBM", Some("Garut Kota"), status)
}

pub fn pdf_document(file_name: &str, size: usize) -> UploadedDocument {
    UploadedDocument {
        file_name: file_name.to_string(),
        content_type: "application/pdf".to_string(),
        data: vec![b'%'; size],
    }
}

// =============================================================================
// STORE
// =============================================================================

/// `SubmissionStore` backed by a vector
#[derive(Default)]
pub struct InMemorySubmissionStore {
    records: Mutex<Vec<Submission>>,
    next_id: AtomicI64,
    /// Make `list_recent` fail
    pub fail_reads: AtomicBool,
    /// Make `insert` and `update_status` fail
    pub fail_writes: AtomicBool,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, records: Vec<Submission>) {
        let max_id = records.iter().map(|s| s.id).max().unwrap_or(0);
        self.next_id.fetch_max(max_id, Ordering::SeqCst);
        self.records.lock().unwrap().extend(records);
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, id: i64) -> Option<Submission> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    fn check(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn list_recent(&self) -> Result<Vec<Submission>> {
        Self::check(&self.fail_reads)?;
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>> {
        Self::check(&self.fail_reads)?;
        Ok(self.get(id))
    }

    async fn insert(&self, new: NewSubmission) -> Result<Submission> {
        Self::check(&self.fail_writes)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let submission = Submission {
            id,
            nama_perusahaan: new.nama_perusahaan,
            alamat_perusahaan: new.alamat_perusahaan,
            alamat_uttp: new.alamat_uttp,
            kecamatan: new.kecamatan,
            no_contact: new.no_contact,
            jenis_uttp: new.jenis_uttp,
            nomor_spbu: new.nomor_spbu,
            jumlah_pompa: Some(new.jumlah_pompa),
            jumlah_nozzle: Some(new.jumlah_nozzle),
            nomor_surat: new.nomor_surat,
            tanggal_surat: new.tanggal_surat,
            file_surat_url: new.file_surat_url,
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(submission.clone());
        Ok(submission)
    }

    async fn update_status(&self, id: i64, status: SubmissionStatus) -> Result<Option<Submission>> {
        Self::check(&self.fail_writes)?;
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|s| s.id == id).map(|s| {
            s.status = status;
            s.clone()
        }))
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// `ObjectStorage` backed by a map, counting uploads
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub upload_calls: AtomicUsize,
    pub fail_uploads: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn upload(&self, name: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("bucket unavailable".to_string()));
        }
        let key = format!("{}/{}", TEST_PREFIX, name);
        self.objects.lock().unwrap().insert(key.clone(), data);
        Ok(key)
    }

    fn public_url(&self, key: &str) -> Result<String> {
        build_public_url(TEST_STORAGE_ENDPOINT, TEST_BUCKET, key)
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Object '{}' not found", key)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

// =============================================================================
// ROUTERS
// =============================================================================

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemorySubmissionStore>,
    pub storage: Arc<InMemoryStorage>,
}

/// Submission routes over in-memory store and storage
pub fn test_app() -> TestApp {
    let store = Arc::new(InMemorySubmissionStore::new());
    let storage = Arc::new(InMemoryStorage::new());
    let service = Arc::new(SubmissionService::new(store.clone(), storage.clone()));

    let app: Router = submissions::routes(service, "/admin/perpanjang");
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        store,
        storage,
    }
}
