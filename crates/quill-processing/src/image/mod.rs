//! Image processing module
//!
//! Thumbnail derivation on top of the `image` crate. Everything here is
//! CPU-bound and synchronous except [`ThumbnailDeriver::derive_all_blocking`],
//! which moves the work onto tokio's blocking pool.

pub mod deriver;

pub use deriver::{DeriveError, DerivedImage, ThumbnailDeriver};
