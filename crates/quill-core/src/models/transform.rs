//! Thumbnail transform presets
//!
//! A [`TransformSpec`] is the geometric recipe for one derived image. Specs are
//! immutable values; the content hash of a derived file is computed from the
//! spec, so two equal specs always name the same file.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Largest width or height a derived image may have.
pub const MAX_DIMENSION: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformSpecError {
    #[error("Invalid dimensions {width}x{height} (each must be between 1 and {max})")]
    InvalidDimensions { width: u32, height: u32, max: u32 },

    #[error("Invalid percent {0} (must be between 1 and 100)")]
    InvalidPercent(u8),

    #[error("Invalid thumbnail method: {0}. Valid values are: crop, fill, resize, percent")]
    UnknownMethod(String),

    #[error("Invalid transform spec '{0}' (expected WIDTHxHEIGHT:METHOD:PERCENT)")]
    Malformed(String),
}

/// How an original is turned into a derived image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailMethod {
    /// Scale then center-crop to exactly the target size
    Crop,
    /// Fit inside the target size and letterbox on a white canvas
    Fill,
    /// Force-scale to exactly the target size, ignoring aspect ratio
    Resize,
    /// Scale both dimensions by `percent / 100`
    #[serde(rename = "percent")]
    PercentScale,
}

impl ThumbnailMethod {
    /// Lowercase name; this is the value that enters the content hash.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailMethod::Crop => "crop",
            ThumbnailMethod::Fill => "fill",
            ThumbnailMethod::Resize => "resize",
            ThumbnailMethod::PercentScale => "percent",
        }
    }
}

impl FromStr for ThumbnailMethod {
    type Err = TransformSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crop" => Ok(ThumbnailMethod::Crop),
            "fill" => Ok(ThumbnailMethod::Fill),
            "resize" => Ok(ThumbnailMethod::Resize),
            "percent" => Ok(ThumbnailMethod::PercentScale),
            _ => Err(TransformSpecError::UnknownMethod(s.to_string())),
        }
    }
}

impl Display for ThumbnailMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Geometric recipe for one derived image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct TransformSpec {
    pub width: u32,
    pub height: u32,
    pub method: ThumbnailMethod,
    /// Scale factor in percent, only used by `PercentScale`
    pub percent: u8,
}

impl TransformSpec {
    pub const fn new(width: u32, height: u32, method: ThumbnailMethod, percent: u8) -> Self {
        Self {
            width,
            height,
            method,
            percent,
        }
    }

    /// Check bounds: width and height in `1..=2000`, percent in `1..=100`.
    pub fn validate(&self) -> Result<(), TransformSpecError> {
        let dimension_ok = |d: u32| (1..=MAX_DIMENSION).contains(&d);
        if !dimension_ok(self.width) || !dimension_ok(self.height) {
            return Err(TransformSpecError::InvalidDimensions {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }

        if !(1..=100).contains(&self.percent) {
            return Err(TransformSpecError::InvalidPercent(self.percent));
        }

        Ok(())
    }

    /// Parse a comma-separated list such as `165x100:resize:100,600x400:fill:100`.
    pub fn parse_list(s: &str) -> Result<Vec<TransformSpec>, TransformSpecError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

/// Parses `WIDTHxHEIGHT:METHOD:PERCENT`; the percent part is optional and defaults to 100.
impl FromStr for TransformSpec {
    type Err = TransformSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TransformSpecError::Malformed(s.to_string());

        let mut parts = s.trim().split(':');
        let dims = parts.next().ok_or_else(malformed)?;
        let method = parts.next().ok_or_else(malformed)?.parse()?;
        let percent = match parts.next() {
            Some(p) => p.trim().parse::<u8>().map_err(|_| malformed())?,
            None => 100,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }

        let (width, height) = dims.trim().split_once(['x', 'X']).ok_or_else(malformed)?;
        let width = width.trim().parse::<u32>().map_err(|_| malformed())?;
        let height = height.trim().parse::<u32>().map_err(|_| malformed())?;

        let spec = TransformSpec::new(width, height, method, percent);
        spec.validate()?;
        Ok(spec)
    }
}

impl Display for TransformSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}x{}:{}:{}",
            self.width, self.height, self.method, self.percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("CROP".parse::<ThumbnailMethod>(), Ok(ThumbnailMethod::Crop));
        assert_eq!("Fill".parse::<ThumbnailMethod>(), Ok(ThumbnailMethod::Fill));
        assert_eq!(
            "percent".parse::<ThumbnailMethod>(),
            Ok(ThumbnailMethod::PercentScale)
        );
        assert!("adaptive".parse::<ThumbnailMethod>().is_err());
    }

    #[test]
    fn test_method_hash_names() {
        assert_eq!(ThumbnailMethod::Crop.as_str(), "crop");
        assert_eq!(ThumbnailMethod::PercentScale.as_str(), "percent");
    }

    #[test]
    fn test_validate_bounds() {
        assert!(TransformSpec::new(150, 150, ThumbnailMethod::Crop, 85)
            .validate()
            .is_ok());
        assert!(TransformSpec::new(1, 1, ThumbnailMethod::Resize, 1)
            .validate()
            .is_ok());
        assert!(TransformSpec::new(2000, 2000, ThumbnailMethod::Fill, 100)
            .validate()
            .is_ok());

        assert!(TransformSpec::new(0, 150, ThumbnailMethod::Crop, 85)
            .validate()
            .is_err());
        assert!(TransformSpec::new(150, 2001, ThumbnailMethod::Crop, 85)
            .validate()
            .is_err());
        assert_eq!(
            TransformSpec::new(150, 150, ThumbnailMethod::Crop, 0).validate(),
            Err(TransformSpecError::InvalidPercent(0))
        );
        assert_eq!(
            TransformSpec::new(150, 150, ThumbnailMethod::Crop, 101).validate(),
            Err(TransformSpecError::InvalidPercent(101))
        );
    }

    #[test]
    fn test_parse_spec() {
        let spec: TransformSpec = "165x100:resize:100".parse().unwrap();
        assert_eq!(spec, TransformSpec::new(165, 100, ThumbnailMethod::Resize, 100));

        let spec: TransformSpec = "600X400:fill".parse().unwrap();
        assert_eq!(spec, TransformSpec::new(600, 400, ThumbnailMethod::Fill, 100));

        assert!("600x400".parse::<TransformSpec>().is_err());
        assert!("600x:crop:100".parse::<TransformSpec>().is_err());
        assert!("0x10:crop:100".parse::<TransformSpec>().is_err());
        assert!("10x10:crop:100:extra".parse::<TransformSpec>().is_err());
    }

    #[test]
    fn test_parse_list() {
        let specs = TransformSpec::parse_list("165x100:resize:100, 600x400:crop:100").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].method, ThumbnailMethod::Crop);

        assert!(TransformSpec::parse_list("165x100:resize:100,bogus").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let spec = TransformSpec::new(220, 160, ThumbnailMethod::PercentScale, 50);
        assert_eq!(spec.to_string(), "220x160:percent:50");
        assert_eq!(spec.to_string().parse::<TransformSpec>(), Ok(spec));
    }
}
