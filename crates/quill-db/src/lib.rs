//! Quill database library
//!
//! Postgres persistence for media records, plus the [`MediaPersistence`]
//! seam the ingestion service depends on.

pub mod db;
pub mod persistence;
pub mod setup;

pub use db::media::MediaRepository;
pub use db::transaction::TransactionGuard;
pub use persistence::MediaPersistence;
pub use setup::setup_database;
