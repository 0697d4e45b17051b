//! Content-hash naming for derived images
//!
//! A derived file's name is a pure function of the original's stored name and
//! the transform, so it can be recomputed on read instead of being stored.

use md5::{Digest, Md5};
use quill_core::models::TransformSpec;

use crate::sanitizer::split_extension;

/// Lowercase hex MD5 of `filename + width + height + method + percent`.
pub fn content_hash(filename: &str, spec: &TransformSpec) -> String {
    let mut hasher = Md5::new();
    hasher.update(filename.as_bytes());
    hasher.update(spec.width.to_string());
    hasher.update(spec.height.to_string());
    hasher.update(spec.method.as_str());
    hasher.update(spec.percent.to_string());
    hex::encode(hasher.finalize())
}

/// On-disk name of the image derived from `filename` with `spec`: `<hash>.<ext>`.
pub fn derived_filename(filename: &str, spec: &TransformSpec) -> String {
    let hash = content_hash(filename, spec);
    match split_extension(filename).1 {
        Some(ext) => format!("{}.{}", hash, ext),
        None => hash,
    }
}

/// Derived names for every spec, in spec order.
pub fn derived_filenames(filename: &str, specs: &[TransformSpec]) -> Vec<String> {
    specs
        .iter()
        .map(|spec| derived_filename(filename, spec))
        .collect()
}
