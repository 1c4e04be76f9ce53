use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use prism_core::error::{PrismError, Result};
use prism_core::raster::{RasterGeometry, RasterOpener, RasterSource};

/// In-memory raster standing in for a file-backed source.
pub struct MemoryRaster {
    bands: Vec<Array2<f64>>,
    geometry: RasterGeometry,
}

impl MemoryRaster {
    pub fn new(bands: Vec<Array2<f64>>) -> Self {
        let (rows, cols) = bands.first().map(|b| b.dim()).unwrap_or((0, 0));
        Self {
            bands,
            geometry: RasterGeometry {
                rows,
                cols,
                ..Default::default()
            },
        }
    }
}

impl RasterSource for MemoryRaster {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    fn read_band(&mut self, index: usize) -> Result<Array2<f64>> {
        if index == 0 || index > self.bands.len() {
            return Err(PrismError::BandIndexOutOfRange {
                index,
                total: self.bands.len(),
            });
        }
        Ok(self.bands[index - 1].clone())
    }
}

/// Opener serving preloaded images by path, recording the order in which
/// they are opened.
#[derive(Default)]
pub struct MemoryOpener {
    images: HashMap<PathBuf, Vec<Array2<f64>>>,
    pub opened: RefCell<Vec<PathBuf>>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bands: Vec<Array2<f64>>) {
        self.images.insert(PathBuf::from(path), bands);
    }
}

impl RasterOpener for MemoryOpener {
    type Source = MemoryRaster;

    fn open(&self, path: &Path) -> Result<MemoryRaster> {
        self.opened.borrow_mut().push(path.to_path_buf());
        self.images
            .get(path)
            .map(|bands| MemoryRaster::new(bands.clone()))
            .ok_or_else(|| PrismError::NotFound(path.to_path_buf()))
    }
}

/// Build a (rows, cols) band from a function of (row, col).
pub fn band<F: Fn(usize, usize) -> f64>(rows: usize, cols: usize, f: F) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(r, c)| f(r, c))
}
