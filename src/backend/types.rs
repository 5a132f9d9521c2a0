use crate::metadata::ImageMetadata;
use chrono::NaiveDate;
use std::fmt;

/// One remote raster: a metadata mapping plus per-band values readable at a
/// geographic point. Immutable once fetched; shared read-only across click
/// handlers.
pub trait SourceImage: Send + Sync {
    fn metadata(&self) -> &ImageMetadata;

    /// Band identifiers in band-index order, e.g. `["B001", "B002", ...]`.
    fn band_names(&self) -> &[String];

    /// Reads one band's value at backend coordinates (x = longitude,
    /// y = latitude).
    fn value_at(&self, band_index: usize, x: f64, y: f64) -> Result<f64, SampleError>;
}

#[derive(Debug)]
pub enum SampleError {
    OutOfBounds { x: f64, y: f64 },
    Backend(String),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::OutOfBounds { x, y } => {
                write!(f, "Point ({}, {}) is outside the image extent", x, y)
            }
            SampleError::Backend(e) => write!(f, "Imagery backend error: {}", e),
        }
    }
}

impl std::error::Error for SampleError {}

#[derive(Debug)]
pub enum FetchError {
    Backend(String),
    NoMatch { site: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Backend(e) => write!(f, "Imagery backend error: {}", e),
            FetchError::NoMatch { site } => {
                write!(f, "No image matches site {} in the requested date range", site)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Fetch-by-filter contract: a NEON site code plus an acquisition date range.
#[derive(Debug, Clone)]
pub struct ImageFilter {
    pub site: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ImageFilter {
    /// Checks an image's metadata against this filter. Images missing the
    /// site or date properties, or carrying an unparseable date, simply do
    /// not match.
    pub fn matches(&self, metadata: &ImageMetadata) -> bool {
        if metadata.get("NEON_SITE") != Some(self.site.as_str()) {
            return false;
        }

        let Some(date_str) = metadata.get("ACQUISITION_DATE") else {
            return false;
        };

        match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            Ok(date) => self.start_date <= date && date <= self.end_date,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_filter() -> ImageFilter {
        ImageFilter {
            site: "SOAP".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        }
    }

    #[test]
    fn test_filter_matches_site_and_date() {
        let metadata = ImageMetadata::from_iter([
            ("NEON_SITE", "SOAP"),
            ("ACQUISITION_DATE", "2021-06-14"),
        ]);
        assert!(test_filter().matches(&metadata));
    }

    #[test]
    fn test_filter_rejects_other_site() {
        let metadata = ImageMetadata::from_iter([
            ("NEON_SITE", "SJER"),
            ("ACQUISITION_DATE", "2021-06-14"),
        ]);
        assert!(!test_filter().matches(&metadata));
    }

    #[test]
    fn test_filter_rejects_out_of_range_date() {
        let metadata = ImageMetadata::from_iter([
            ("NEON_SITE", "SOAP"),
            ("ACQUISITION_DATE", "2019-06-14"),
        ]);
        assert!(!test_filter().matches(&metadata));
    }

    #[test]
    fn test_filter_skips_missing_or_bad_properties() {
        let no_date = ImageMetadata::from_iter([("NEON_SITE", "SOAP")]);
        assert!(!test_filter().matches(&no_date));

        let bad_date = ImageMetadata::from_iter([
            ("NEON_SITE", "SOAP"),
            ("ACQUISITION_DATE", "June 14th"),
        ]);
        assert!(!test_filter().matches(&bad_date));
    }
}
