use ndarray::{Array2, Array3, Axis};

use crate::error::{PrismError, Result};

pub mod assemble;
pub mod standardize;

pub use assemble::assemble_stack;
pub use standardize::standardize;

/// An ordered set of co-registered bands, shape (bands, rows, cols).
///
/// Band order is source order, then band index within each source; it
/// decides which output component corresponds to which input channel and is
/// preserved through the whole pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct BandStack {
    pub data: Array3<f64>,
}

impl BandStack {
    /// Stack bands along a new leading axis. Every band must share the grid
    /// of the first; nothing is stacked otherwise.
    pub fn from_bands(bands: Vec<Array2<f64>>) -> Result<Self> {
        let first = bands.first().ok_or(PrismError::EmptyStack)?;
        let (rows, cols) = first.dim();

        for (position, band) in bands.iter().enumerate() {
            let (found_rows, found_cols) = band.dim();
            if (found_rows, found_cols) != (rows, cols) {
                return Err(PrismError::GridMismatch {
                    band: format!("stack position {position}"),
                    expected_rows: rows,
                    expected_cols: cols,
                    found_rows,
                    found_cols,
                });
            }
        }

        let views: Vec<_> = bands.iter().map(|b| b.view()).collect();
        let data = ndarray::stack(Axis(0), &views).expect("bands share a grid");
        Ok(Self { data })
    }

    pub fn n_bands(&self) -> usize {
        self.data.dim().0
    }

    pub fn rows(&self) -> usize {
        self.data.dim().1
    }

    pub fn cols(&self) -> usize {
        self.data.dim().2
    }
}
