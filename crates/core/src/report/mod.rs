//! Manager reports: periodic progress against an approved plan.
//!
//! # Modules
//!
//! - `types` - Reports, status updates and loaded views
//! - `error` - Report operation errors
//! - `service` - Orchestration over the report store and evidence storage

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{ManagerReport, ReportReview, ReportStatusUpdate, ReportSubmission, ReportView};
