/// Maximum supporting document size in bytes (10MB). A file of exactly this
/// size is accepted.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Extra body allowance on multipart routes for the text fields and boundaries
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Document extensions accepted by the submission form
pub const ALLOWED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Path of the public submission form page
pub const FORM_PAGE_PATH: &str = "/pengajuan-tera";

/// Path of the admin listing page
pub const ADMIN_PAGE_PATH: &str = "/admin/perpanjang";
