pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod views;

pub use repositories::PgSubmissionStore;
pub use routes::routes;
pub use services::SubmissionService;
