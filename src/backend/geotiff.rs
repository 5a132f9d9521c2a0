use super::types::{FetchError, ImageFilter, SampleError, SourceImage};
use crate::metadata::ImageMetadata;
use gdal::{Dataset, Metadata};
use glob::glob;
use std::path::Path;
use std::sync::Mutex;

/// Converts backend (x, y) coordinates to a pixel position using the GDAL
/// geotransform [top_left_x, pixel_width, 0, top_left_y, 0, -pixel_height].
fn locate_pixel(
    geo: &[f64; 6],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
) -> Result<(usize, usize), SampleError> {
    let col = ((x - geo[0]) / geo[1]).floor();
    let row = ((y - geo[3]) / geo[5]).floor();

    if col < 0.0 || row < 0.0 || col >= width as f64 || row >= height as f64 {
        return Err(SampleError::OutOfBounds { x, y });
    }

    Ok((col as usize, row as usize))
}

/// A NEON AOP reflectance mosaic opened from a local GeoTIFF.
pub struct GeoTiffImage {
    // GDAL dataset handles are not thread safe
    dataset: Mutex<Dataset>,
    metadata: ImageMetadata,
    band_names: Vec<String>,
    geo_transform: [f64; 6],
    width: usize,
    height: usize,
}

impl GeoTiffImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FetchError> {
        let path = path.as_ref();

        let dataset = Dataset::open(path)
            .map_err(|e| FetchError::Backend(format!("Failed to open {}: {}", path.display(), e)))?;

        let geo_transform = dataset
            .geo_transform()
            .map_err(|e| FetchError::Backend(format!("Failed to read geotransform: {}", e)))?;

        let (width, height) = dataset.raster_size();

        let mut metadata = ImageMetadata::new();
        if let Some(entries) = dataset.metadata_domain("") {
            for entry in entries {
                if let Some((key, value)) = entry.split_once('=') {
                    metadata.insert(key, value);
                }
            }
        }

        let mut band_names = Vec::new();
        for index in 1..=dataset.raster_count() {
            let band = dataset
                .rasterband(index)
                .map_err(|e| FetchError::Backend(format!("Failed to open band {}: {}", index, e)))?;
            let description = band.description().unwrap_or_default();
            if description.is_empty() {
                // Undescribed bands still need stable identifiers
                band_names.push(format!("B{:03}", index));
            } else {
                band_names.push(description);
            }
        }

        Ok(Self {
            dataset: Mutex::new(dataset),
            metadata,
            band_names,
            geo_transform,
            width,
            height,
        })
    }
}

impl SourceImage for GeoTiffImage {
    fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    fn band_names(&self) -> &[String] {
        &self.band_names
    }

    fn value_at(&self, band_index: usize, x: f64, y: f64) -> Result<f64, SampleError> {
        let (col, row) = locate_pixel(&self.geo_transform, self.width, self.height, x, y)?;

        let dataset = self
            .dataset
            .lock()
            .map_err(|_| SampleError::Backend("GDAL dataset lock poisoned".to_string()))?;

        let band = dataset
            .rasterband(band_index + 1)
            .map_err(|e| SampleError::Backend(format!("Failed to open band: {}", e)))?;

        let buffer = band
            .read_as::<f64>((col as isize, row as isize), (1, 1), (1, 1), None)
            .map_err(|e| SampleError::Backend(format!("Failed to read pixel: {}", e)))?;

        let raw_value = buffer[(0, 0)];
        let scale = band.scale().unwrap_or(1.0);

        // Reflectance mosaics mark pixels outside the flight box with the
        // band's no-data value
        if band.no_data_value().is_some_and(|nodata| raw_value == nodata) {
            return Err(SampleError::OutOfBounds { x, y });
        }

        Ok(raw_value * scale)
    }
}

/// A directory of reflectance GeoTIFFs standing in for the hosted image
/// collection. Fetch scans the directory and returns the first image whose
/// metadata matches the filter.
pub struct GeoTiffCatalog {
    directory: String,
}

impl GeoTiffCatalog {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn fetch_first(&self, filter: &ImageFilter) -> Result<GeoTiffImage, FetchError> {
        let pattern = format!("{}/*.tif", self.directory);

        let mut paths: Vec<_> = glob(&pattern)
            .map_err(|e| FetchError::Backend(format!("Invalid catalog pattern: {}", e)))?
            .filter_map(Result::ok)
            .collect();
        paths.sort();

        for path in paths {
            match GeoTiffImage::open(&path) {
                Ok(image) if filter.matches(image.metadata()) => return Ok(image),
                Ok(_) => continue,
                Err(e) => eprintln!("Could not load {}: {}", path.display(), e),
            }
        }

        Err(FetchError::NoMatch {
            site: filter.site.clone(),
        })
    }
}
