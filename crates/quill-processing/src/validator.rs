use quill_core::constants::{
    content_types_for_extension, ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS,
};

use crate::sanitizer::{self, split_extension, FilenameError};
use crate::upload::UploadedFile;

/// Upload batch validation errors. Per-file variants carry the file's position and name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No files were uploaded")]
    EmptyBatch,

    #[error("Too many files: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("File {index} ({filename}) is empty")]
    EmptyFile { index: usize, filename: String },

    #[error("File {index} ({filename}) is too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge {
        index: usize,
        filename: String,
        size: usize,
        max: usize,
    },

    #[error("File {index} has an invalid filename: {source}")]
    InvalidFilename {
        index: usize,
        filename: String,
        #[source]
        source: FilenameError,
    },

    #[error("File {index} ({filename}) has an unsupported extension (allowed: {allowed})")]
    UnsupportedExtension {
        index: usize,
        filename: String,
        allowed: String,
    },

    #[error("File {index} ({filename}) has unsupported content type {content_type:?}")]
    UnsupportedMimeType {
        index: usize,
        filename: String,
        content_type: Option<String>,
    },
}

impl ValidationError {
    pub fn is_security_violation(&self) -> bool {
        matches!(self, ValidationError::InvalidFilename { source, .. } if source.is_security_violation())
    }

    /// Client filename of the offending file, if the error concerns a single file.
    pub fn filename(&self) -> Option<&str> {
        match self {
            ValidationError::EmptyBatch | ValidationError::TooManyFiles { .. } => None,
            ValidationError::EmptyFile { filename, .. }
            | ValidationError::FileTooLarge { filename, .. }
            | ValidationError::InvalidFilename { filename, .. }
            | ValidationError::UnsupportedExtension { filename, .. }
            | ValidationError::UnsupportedMimeType { filename, .. } => Some(filename),
        }
    }
}

/// Upload batch validator
///
/// Checks the whole batch before any I/O happens and reports the first
/// violation found, scanning files in the order they were given.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    max_file_count: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, max_file_count: usize) -> Self {
        Self {
            max_file_size,
            max_file_count,
        }
    }

    pub fn validate(&self, files: &[UploadedFile]) -> Result<(), ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        if files.len() > self.max_file_count {
            return Err(ValidationError::TooManyFiles {
                count: files.len(),
                max: self.max_file_count,
            });
        }

        for (index, file) in files.iter().enumerate() {
            self.validate_file(index, file)?;
        }

        Ok(())
    }

    /// Validate a single file; `index` is only used for error reporting.
    pub fn validate_file(&self, index: usize, file: &UploadedFile) -> Result<(), ValidationError> {
        let filename = || file.filename.clone();

        if file.size() == 0 {
            return Err(ValidationError::EmptyFile {
                index,
                filename: filename(),
            });
        }

        if file.size() > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                index,
                filename: filename(),
                size: file.size(),
                max: self.max_file_size,
            });
        }

        sanitizer::check(&file.filename).map_err(|source| ValidationError::InvalidFilename {
            index,
            filename: filename(),
            source,
        })?;

        let extension = split_extension(&file.filename)
            .1
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| ValidationError::UnsupportedExtension {
                index,
                filename: filename(),
                allowed: ALLOWED_EXTENSIONS.join(", "),
            })?;

        let content_type = file
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase());
        let accepted = content_type.as_deref().is_some_and(|ct| {
            ALLOWED_CONTENT_TYPES.contains(&ct) && content_types_for_extension(&extension).contains(&ct)
        });
        if !accepted {
            return Err(ValidationError::UnsupportedMimeType {
                index,
                filename: filename(),
                content_type: file.content_type.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile::new(name, Some(content_type.to_string()), vec![0u8; size])
    }

    fn validator() -> UploadValidator {
        UploadValidator::new(5 * MB, 10)
    }

    #[test]
    fn test_valid_batch() {
        let files = vec![
            file("photo.jpg", "image/jpeg", 1024),
            file("photo.JPEG", "image/jpg", 1024),
            file("logo.png", "image/png", 10),
            file("anim.gif", "image/gif", 10),
            file("pic.webp", "IMAGE/WEBP", 10),
        ];
        assert!(validator().validate(&files).is_ok());
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(validator().validate(&[]), Err(ValidationError::EmptyBatch));
    }

    #[test]
    fn test_too_many_files() {
        let files: Vec<_> = (0..11).map(|_| file("a.png", "image/png", 1)).collect();
        assert_eq!(
            validator().validate(&files),
            Err(ValidationError::TooManyFiles { count: 11, max: 10 })
        );
    }

    #[test]
    fn test_unsupported_extension_names_offending_file() {
        let files = vec![
            file("photo.jpg", "image/jpeg", 2 * MB),
            file("doc.txt", "text/plain", 100),
        ];
        let err = validator().validate(&files).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedExtension { index: 1, .. }));
        assert_eq!(err.filename(), Some("doc.txt"));
    }

    #[test]
    fn test_first_violation_wins() {
        // Empty beats every later check on the same file
        let files = vec![file("../evil.txt", "text/plain", 0)];
        assert!(matches!(
            validator().validate(&files),
            Err(ValidationError::EmptyFile { index: 0, .. })
        ));

        let files = vec![file("../evil.jpg", "image/jpeg", 6 * MB)];
        assert!(matches!(
            validator().validate(&files),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validator()
            .validate(&[file("a.png", "image/png", 5 * MB)])
            .is_ok());
        assert!(validator()
            .validate(&[file("a.png", "image/png", 5 * MB + 1)])
            .is_err());
    }

    #[test]
    fn test_traversal_is_security_violation() {
        let err = validator()
            .validate(&[file("../../etc/passwd.jpg", "image/jpeg", 10)])
            .unwrap_err();
        assert!(err.is_security_violation());

        let err = validator()
            .validate(&[file(".hidden.jpg", "image/jpeg", 10)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFilename { .. }));
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_mime_must_match_extension() {
        let err = validator()
            .validate(&[file("photo.png", "image/jpeg", 10)])
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedMimeType { .. }));

        let missing = UploadedFile::new("photo.png", None, vec![1u8; 10]);
        assert!(matches!(
            validator().validate(&[missing]),
            Err(ValidationError::UnsupportedMimeType { content_type: None, .. })
        ));
    }
}
