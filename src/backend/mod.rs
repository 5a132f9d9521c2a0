pub mod geotiff;
pub mod memory;
pub mod types;

pub use geotiff::{GeoTiffCatalog, GeoTiffImage};
pub use memory::{Extent, MemoryImage};
pub use types::{FetchError, ImageFilter, SampleError, SourceImage};
