//! Evidence file storage using Apache OpenDAL.
//!
//! Uploads must finish and return a stable reference before a progress
//! row is allowed to point at the file.
//!
//! Supported backends:
//! - S3-compatible: Supabase Storage, Cloudflare R2, AWS S3
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Apache OpenDAL                     │
//! ├──────────────────────────────────────────────────────┤
//! │ op.write_with("key", bytes)  │ op.stat("key")         │
//! │ op.delete("key")             │                        │
//! └──────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{EvidenceFile, EvidenceRef, StorageService};
