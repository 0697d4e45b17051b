//! Database repositories for data access layer
//
// Media and media file repositories
pub mod media;
//
// Transaction utilities
pub mod transaction;
