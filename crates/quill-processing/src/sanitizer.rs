//! Filename sanitizing
//!
//! Turns an untrusted client filename into a name that is safe to use as a
//! single path component inside a batch directory. Dangerous names are
//! rejected outright rather than repaired.

use quill_core::constants::MAX_FILENAME_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("Filename is blank")]
    Blank,

    #[error("Filename too long: {length} characters (max: {max})")]
    TooLong { length: usize, max: usize },

    #[error("Filename contains a path traversal sequence: {0}")]
    PathTraversal(String),

    #[error("Filename must not start or end with '.': {0}")]
    LeadingOrTrailingDot(String),
}

impl FilenameError {
    /// Traversal attempts are treated as hostile input, not as a typo.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, FilenameError::PathTraversal(_))
    }
}

/// Run the rejection checks without producing a sanitized name.
pub fn check(raw: &str) -> Result<(), FilenameError> {
    if raw.trim().is_empty() {
        return Err(FilenameError::Blank);
    }

    let length = raw.chars().count();
    if length > MAX_FILENAME_LENGTH {
        return Err(FilenameError::TooLong {
            length,
            max: MAX_FILENAME_LENGTH,
        });
    }

    if raw.contains("..") || raw.contains('/') || raw.contains('\\') {
        return Err(FilenameError::PathTraversal(raw.to_string()));
    }

    if raw.starts_with('.') || raw.ends_with('.') {
        return Err(FilenameError::LeadingOrTrailingDot(raw.to_string()));
    }

    Ok(())
}

/// Split a name into stem and lowercased extension.
///
/// Only a purely ASCII-alphanumeric suffix after the last dot counts as an
/// extension; anything else stays part of the stem.
pub fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            (stem, Some(ext.to_ascii_lowercase()))
        }
        _ => (name, None),
    }
}

/// Validate and sanitize a client filename.
///
/// Every character of the stem outside `[A-Za-z0-9._-]` becomes `_`, runs of
/// `_` collapse to one, and `_`/`.` are trimmed from both ends. A stem that ends
/// up empty is replaced by `file_<random token>`.
pub fn sanitize(raw: &str) -> Result<String, FilenameError> {
    check(raw)?;

    let (stem, extension) = split_extension(raw);

    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '_'
        };
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }

    let mut stem = cleaned.trim_matches(|c| c == '_' || c == '.').to_string();
    if stem.is_empty() {
        stem = format!("file_{}", uuid::Uuid::new_v4().simple());
    }

    Ok(match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_and_collapses() {
        assert_eq!(sanitize("my photo@2024 (1).jpg").unwrap(), "my_photo_2024_1.jpg");
        assert_eq!(sanitize("über_file.jpg").unwrap(), "ber_file.jpg");
        assert_eq!(sanitize("image.png").unwrap(), "image.png");
        assert_eq!(sanitize("my-file_1.jpg").unwrap(), "my-file_1.jpg");
    }

    #[test]
    fn test_sanitize_case_folds_extension() {
        assert_eq!(sanitize("Holiday.JPG").unwrap(), "Holiday.jpg");
        assert_eq!(sanitize("a.PnG").unwrap(), "a.png");
    }

    #[test]
    fn test_sanitize_empty_stem_gets_token() {
        let first = sanitize("@#$%.jpg").unwrap();
        let second = sanitize("@#$%.jpg").unwrap();
        assert!(first.starts_with("file_"));
        assert!(first.ends_with(".jpg"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_sanitize_rejects_path_traversal() {
        for name in ["../etc/passwd", "foo/bar.jpg", "foo\\bar.jpg", "a..b.png"] {
            let err = sanitize(name).unwrap_err();
            assert!(err.is_security_violation(), "{name} should be a traversal");
        }
    }

    #[test]
    fn test_sanitize_rejects_blank_and_dots() {
        assert_eq!(sanitize(""), Err(FilenameError::Blank));
        assert_eq!(sanitize("   "), Err(FilenameError::Blank));
        assert!(matches!(
            sanitize(".htaccess"),
            Err(FilenameError::LeadingOrTrailingDot(_))
        ));
        assert!(matches!(
            sanitize("photo.jpg."),
            Err(FilenameError::LeadingOrTrailingDot(_))
        ));
    }

    #[test]
    fn test_sanitize_length_checked_before_stripping() {
        let name = format!("{}.jpg", "@".repeat(252));
        assert_eq!(name.chars().count(), 256);
        assert!(matches!(sanitize(&name), Err(FilenameError::TooLong { .. })));

        let name = format!("{}.jpg", "a".repeat(251));
        assert!(sanitize(&name).is_ok());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["my photo@2024 (1).jpg", "über_file.jpg", "x-y.z.webp", "plain"] {
            let once = sanitize(name).unwrap();
            assert_eq!(sanitize(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a.JPG"), ("a", Some("jpg".to_string())));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz".to_string())));
        assert_eq!(split_extension("noext"), ("noext", None));
        assert_eq!(split_extension("weird.j pg"), ("weird.j pg", None));
    }
}
