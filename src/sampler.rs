use crate::backend::{SampleError, SourceImage};
use crate::point::ClickPoint;
use regex::Regex;

/// Reads the per-band reflectance values of an image at a clicked point.
///
/// Only reflectance bands take part: identifiers of the form `B` followed by
/// digits (`B001` ... `B426`). Ancillary bands such as quality masks are
/// excluded without disturbing the order of the remaining bands.
pub struct SpectrumSampler {
    band_pattern: Regex,
}

impl Default for SpectrumSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumSampler {
    pub fn new() -> Self {
        Self {
            band_pattern: Regex::new(r"^B\d+$").unwrap(),
        }
    }

    /// This is the pipeline's sole I/O-bound step: each band read may go to
    /// the imagery backend.
    pub fn sample(
        &self,
        image: &dyn SourceImage,
        point: ClickPoint,
    ) -> Result<Vec<f64>, SampleError> {
        let (x, y) = point.to_xy();

        let mut values = Vec::new();
        for (index, name) in image.band_names().iter().enumerate() {
            if !self.band_pattern.is_match(name) {
                continue;
            }
            values.push(image.value_at(index, x, y)?);
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Extent, MemoryImage};
    use crate::metadata::ImageMetadata;
    use std::sync::Mutex;

    fn test_extent() -> Extent {
        Extent {
            xmin: -120.0,
            xmax: -118.0,
            ymin: 36.0,
            ymax: 38.0,
        }
    }

    #[test]
    fn test_sample_returns_one_value_per_reflectance_band() {
        let mut image = MemoryImage::new(2, 2, test_extent());
        image.push_flat_band("B001", 0.12);
        image.push_flat_band("B002", 0.15);
        image.push_flat_band("B003", 0.19);

        let point = ClickPoint::new(37.0, -119.0).unwrap();
        let values = SpectrumSampler::new().sample(&image, point).unwrap();

        assert_eq!(values, vec![0.12, 0.15, 0.19]);
    }

    #[test]
    fn test_sample_excludes_non_reflectance_bands() {
        let mut image = MemoryImage::new(2, 2, test_extent());
        image.push_flat_band("B001", 0.12);
        image.push_flat_band("QA_MASK", 1.0);
        image.push_flat_band("B002", 0.15);

        let point = ClickPoint::new(37.0, -119.0).unwrap();
        let values = SpectrumSampler::new().sample(&image, point).unwrap();

        assert_eq!(values, vec![0.12, 0.15]);
    }

    #[test]
    fn test_sample_out_of_extent_point() {
        let mut image = MemoryImage::new(2, 2, test_extent());
        image.push_flat_band("B001", 0.12);

        let point = ClickPoint::new(0.0, 0.0).unwrap();
        let result = SpectrumSampler::new().sample(&image, point);

        assert!(matches!(result, Err(SampleError::OutOfBounds { .. })));
    }

    // Records the coordinates the backend receives, to pin down the
    // (lat, lon) -> (x, y) conversion.
    struct RecordingImage {
        metadata: ImageMetadata,
        band_names: Vec<String>,
        seen: Mutex<Vec<(f64, f64)>>,
    }

    impl RecordingImage {
        fn new() -> Self {
            Self {
                metadata: ImageMetadata::new(),
                band_names: vec!["B001".to_string()],
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl SourceImage for RecordingImage {
        fn metadata(&self) -> &ImageMetadata {
            &self.metadata
        }

        fn band_names(&self) -> &[String] {
            &self.band_names
        }

        fn value_at(&self, _band_index: usize, x: f64, y: f64) -> Result<f64, SampleError> {
            self.seen.lock().unwrap().push((x, y));
            Ok(0.0)
        }
    }

    #[test]
    fn test_sample_converts_lat_lon_to_x_y() {
        let image = RecordingImage::new();
        let point = ClickPoint::new(10.0, 20.0).unwrap();

        SpectrumSampler::new().sample(&image, point).unwrap();

        let seen = image.seen.lock().unwrap();
        assert_eq!(*seen, vec![(20.0, 10.0)]);
    }
}
