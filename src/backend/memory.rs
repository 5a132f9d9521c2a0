#![allow(dead_code)]
use super::types::{SampleError, SourceImage};
use crate::metadata::ImageMetadata;

/// Geographic extent of a gridded image, in backend (x, y) coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

#[derive(Debug, Clone)]
struct MemoryBand {
    name: String,
    values: Vec<f64>,
}

/// An in-memory gridded image with the same extent and out-of-bounds
/// semantics as the GeoTIFF path. Used for synthetic imagery and tests.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    metadata: ImageMetadata,
    bands: Vec<MemoryBand>,
    band_names: Vec<String>,
    width: usize,
    height: usize,
    extent: Extent,
}

impl MemoryImage {
    pub fn new(width: usize, height: usize, extent: Extent) -> Self {
        Self {
            metadata: ImageMetadata::new(),
            bands: Vec::new(),
            band_names: Vec::new(),
            width,
            height,
            extent,
        }
    }

    pub fn insert_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key, value);
    }

    pub fn push_band(&mut self, name: impl Into<String>, values: Vec<f64>) {
        assert_eq!(
            values.len(),
            self.width * self.height,
            "band buffer length must equal width * height"
        );
        let name = name.into();
        self.band_names.push(name.clone());
        self.bands.push(MemoryBand { name, values });
    }

    /// Pushes a band holding one constant value everywhere.
    pub fn push_flat_band(&mut self, name: impl Into<String>, value: f64) {
        let values = vec![value; self.width * self.height];
        self.push_band(name, values);
    }

    fn locate_pixel(&self, x: f64, y: f64) -> Result<usize, SampleError> {
        let Extent {
            xmin,
            xmax,
            ymin,
            ymax,
        } = self.extent;

        if x < xmin || x >= xmax || y <= ymin || y > ymax {
            return Err(SampleError::OutOfBounds { x, y });
        }

        let col = ((x - xmin) / (xmax - xmin) * self.width as f64).floor() as usize;
        let row = ((ymax - y) / (ymax - ymin) * self.height as f64).floor() as usize;

        Ok(row.min(self.height - 1) * self.width + col.min(self.width - 1))
    }
}

impl SourceImage for MemoryImage {
    fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    fn band_names(&self) -> &[String] {
        &self.band_names
    }

    fn value_at(&self, band_index: usize, x: f64, y: f64) -> Result<f64, SampleError> {
        let band = self.bands.get(band_index).ok_or_else(|| {
            SampleError::Backend(format!("Band index {} does not exist", band_index))
        })?;

        let pixel = self.locate_pixel(x, y)?;
        Ok(band.values[pixel])
    }
}
