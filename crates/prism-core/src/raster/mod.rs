use std::path::Path;

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

use crate::error::{PrismError, Result};

pub mod geotiff;

pub use geotiff::{GeoTiffOpener, GeoTiffSource};

/// Raster geometry plus the georeferencing tags carried from a prototype
/// input to the output.
#[derive(Clone, Debug, Default)]
pub struct RasterGeometry {
    pub rows: usize,
    pub cols: usize,
    /// ModelPixelScale: [sx, sy, sz].
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepoint: groups of [i, j, k, x, y, z].
    pub tiepoint: Option<Vec<f64>>,
    /// Raw GeoKeyDirectory entries.
    pub geo_keys: Option<Vec<u16>>,
    /// GeoAsciiParams (projection description).
    pub geo_ascii: Option<String>,
}

impl RasterGeometry {
    pub fn is_georeferenced(&self) -> bool {
        self.pixel_scale.is_some() && self.tiepoint.is_some()
    }
}

/// One open raster input. Band indices are 1-based, matching raster driver
/// conventions; position in an assembled stack is 0-based. Dropping the
/// source closes it.
pub trait RasterSource {
    fn band_count(&self) -> usize;

    fn geometry(&self) -> &RasterGeometry;

    fn read_band(&mut self, index: usize) -> Result<Array2<f64>>;
}

/// Opens rasters by path. The pipeline opens sources one at a time and drops
/// each before the next is opened.
pub trait RasterOpener {
    type Source: RasterSource;

    fn open(&self, path: &Path) -> Result<Self::Source>;
}

/// Write a (bands, rows, cols) raster with the named driver, carrying the
/// prototype's georeferencing. Unknown driver names are rejected before
/// anything is written.
pub fn write_raster(
    path: &Path,
    format_name: &str,
    data: ArrayView3<f64>,
    geometry: &RasterGeometry,
) -> Result<()> {
    match format_name.to_ascii_lowercase().as_str() {
        "gtiff" | "tiff" | "tif" => geotiff::write_geotiff(path, data, geometry),
        other => Err(PrismError::UnsupportedFormat(other.to_string())),
    }
}

/// Write a single (rows, cols) band; same contract as [`write_raster`].
pub fn write_raster_band(
    path: &Path,
    format_name: &str,
    data: ArrayView2<f64>,
    geometry: &RasterGeometry,
) -> Result<()> {
    write_raster(path, format_name, data.insert_axis(Axis(0)), geometry)
}
