//! Band center wavelength extraction for NEON AOP surface reflectance images.
//!
//! NEON AOP images carry one metadata property per spectral band, keyed
//! `WL_FWHM_B###` where `###` is the zero-padded band number. Each value is a
//! comma-separated pair `"<center wavelength nm>,<FWHM nm>"`, for example
//! `WL_FWHM_B001 = "381.5459,5.8465"`. Only the center wavelength is used
//! here; the FWHM token is ignored.

#![allow(dead_code)]
use crate::metadata::ImageMetadata;
use regex::Regex;
use std::fmt;

/// Band center wavelengths in nanometers, index-aligned with the image's
/// reflectance band order.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthList(Vec<f64>);

impl WavelengthList {
    pub fn new(wavelengths: Vec<f64>) -> Self {
        Self(wavelengths)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

#[derive(Debug)]
pub enum SchemaError {
    WavelengthParse { key: String, value: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::WavelengthParse { key, value } => write!(
                f,
                "Metadata property {} has a non-numeric wavelength token: {:?}",
                key, value
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

pub struct WavelengthExtractor {
    key_pattern: Regex,
}

impl Default for WavelengthExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WavelengthExtractor {
    pub fn new() -> Self {
        Self {
            // Anchored on both ends: exactly three digits, nothing else
            key_pattern: Regex::new(r"^WL_FWHM_B\d{3}$").unwrap(),
        }
    }

    /// Pulls the center wavelengths out of an image's metadata, in the
    /// mapping's declared order.
    ///
    /// A matched property whose first comma-separated token does not parse as
    /// a number is an error, not a skip: dropping one entry would shift every
    /// later wavelength against the sampler's band indices.
    pub fn extract(&self, metadata: &ImageMetadata) -> Result<WavelengthList, SchemaError> {
        let mut wavelengths = Vec::new();

        for (key, value) in metadata.iter() {
            if !self.key_pattern.is_match(key) {
                continue;
            }

            let first_token = value.split(',').next().unwrap_or(value).trim();
            let wavelength: f64 =
                first_token
                    .parse()
                    .map_err(|_| SchemaError::WavelengthParse {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;

            wavelengths.push(wavelength);
        }

        Ok(WavelengthList::new(wavelengths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_band() {
        let metadata = ImageMetadata::from_iter([("WL_FWHM_B001", "450.5,10.2")]);

        let wavelengths = WavelengthExtractor::new().extract(&metadata).unwrap();
        assert_eq!(wavelengths.as_slice(), &[450.5]);
    }

    #[test]
    fn test_extract_preserves_declared_order() {
        let metadata = ImageMetadata::from_iter([
            ("SENSOR", "NIS1"),
            ("WL_FWHM_B001", "381.5459,5.8465"),
            ("WL_FWHM_B002", "386.5516,5.8465"),
            ("NEON_SITE", "SOAP"),
            ("WL_FWHM_B003", "391.5573,5.8465"),
        ]);

        let wavelengths = WavelengthExtractor::new().extract(&metadata).unwrap();
        assert_eq!(wavelengths.as_slice(), &[381.5459, 386.5516, 391.5573]);
    }

    #[test]
    fn test_extract_fails_on_non_numeric_token() {
        let metadata = ImageMetadata::from_iter([
            ("WL_FWHM_B001", "450.5,10.2"),
            ("WL_FWHM_B002", "abc,10.2"),
        ]);

        let err = WavelengthExtractor::new().extract(&metadata).unwrap_err();
        let SchemaError::WavelengthParse { key, .. } = err;
        assert_eq!(key, "WL_FWHM_B002");
    }

    #[test]
    fn test_extract_ignores_near_miss_keys() {
        // Band identifiers are exactly three digits; anything else is not a
        // wavelength property
        let metadata = ImageMetadata::from_iter([
            ("WL_FWHM_B01", "100.0,1.0"),
            ("WL_FWHM_B1234", "200.0,1.0"),
            ("WL_FWHM_B001_OLD", "300.0,1.0"),
            ("WL_FWHM_B001", "450.5,10.2"),
        ]);

        let wavelengths = WavelengthExtractor::new().extract(&metadata).unwrap();
        assert_eq!(wavelengths.as_slice(), &[450.5]);
    }

    #[test]
    fn test_extract_empty_metadata() {
        let wavelengths = WavelengthExtractor::new()
            .extract(&ImageMetadata::new())
            .unwrap();
        assert!(wavelengths.is_empty());
    }
}
