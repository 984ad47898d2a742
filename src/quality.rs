//! PNG quality range and the named presets built on it.

use crate::constants::{HIGH_QUALITY_RANGE, MAX_QUALITY, MIN_QUALITY, STANDARD_QUALITY_RANGE};
use crate::error::{CompressionError, Result};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Inclusive quantization quality interval, in percent.
///
/// `min` is the floor below which the quantizer gives up, `max` is the
/// target it aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRange {
    pub min: u8,
    pub max: u8,
}

impl QualityRange {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        for value in [min, max] {
            if !(MIN_QUALITY..=MAX_QUALITY).contains(&value) {
                return Err(CompressionError::InvalidQuality(value));
            }
        }
        if min > max {
            return Err(CompressionError::InvalidQualityRange(format!("{}-{}", min, max)));
        }
        Ok(Self { min, max })
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Preset::default().quality_range()
    }
}

impl fmt::Display for QualityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for QualityRange {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CompressionError::InvalidQualityRange(s.to_string());

        let (min, max) = s.trim().split_once('-').ok_or_else(invalid)?;
        let min: u8 = min.trim().parse().map_err(|_| invalid())?;
        let max: u8 = max.trim().parse().map_err(|_| invalid())?;

        Self::new(min, max)
    }
}

/// The two quality levels the tool ships with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Aggressive quantization (60-80)
    #[default]
    Standard,
    /// Near-lossless quantization (90-95)
    High,
}

impl Preset {
    pub fn quality_range(&self) -> QualityRange {
        let (min, max) = match self {
            Preset::Standard => STANDARD_QUALITY_RANGE,
            Preset::High => HIGH_QUALITY_RANGE,
        };
        QualityRange { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quality_range() {
        assert_eq!("60-80".parse::<QualityRange>().unwrap(), QualityRange { min: 60, max: 80 });
        assert_eq!(" 90 - 95 ".parse::<QualityRange>().unwrap(), QualityRange { min: 90, max: 95 });
        assert_eq!("0-100".parse::<QualityRange>().unwrap(), QualityRange { min: 0, max: 100 });
    }

    #[test]
    fn test_parse_quality_range_rejects_garbage() {
        for input in ["", "80", "a-b", "60-", "-80", "60-80-90"] {
            assert!(
                matches!(
                    input.parse::<QualityRange>(),
                    Err(CompressionError::InvalidQualityRange(_))
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_quality_range_bounds() {
        assert!(matches!(
            QualityRange::new(60, 101),
            Err(CompressionError::InvalidQuality(101))
        ));
        assert!(matches!(
            QualityRange::new(80, 60),
            Err(CompressionError::InvalidQualityRange(_))
        ));
        assert!(QualityRange::new(70, 70).is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(Preset::Standard.quality_range().to_string(), "60-80");
        assert_eq!(Preset::High.quality_range().to_string(), "90-95");
        assert_eq!(QualityRange::default(), Preset::Standard.quality_range());
    }
}
