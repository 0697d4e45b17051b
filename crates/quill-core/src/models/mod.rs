//! Data models for the media pipeline
//!
//! Plain value structs; the link between a media row and its files is the
//! explicit `media_id` field, not an object graph.

mod media;
mod transform;

pub use media::*;
pub use transform::*;
