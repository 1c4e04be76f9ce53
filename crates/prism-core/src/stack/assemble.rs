use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PrismError, Result};
use crate::raster::{RasterOpener, RasterSource};

use super::{standardize, BandStack};

/// Read every band of every source, in order, into one stack.
///
/// Sources are opened strictly one at a time and closed (dropped) as soon as
/// their bands are extracted, including when a later source fails. Every band
/// must match the grid of the first band read; the mismatch is reported with
/// both shapes rather than left for the stacking step to trip over.
pub fn assemble_stack<O: RasterOpener>(
    opener: &O,
    paths: &[PathBuf],
    standardize_bands: bool,
) -> Result<BandStack> {
    let mut bands = Vec::new();
    let mut grid: Option<(usize, usize)> = None;

    for path in paths {
        let mut source = opener.open(path)?;
        let count = source.band_count();
        debug!(path = %path.display(), bands = count, "Reading raster");

        for index in 1..=count {
            let band = source.read_band(index)?;
            let (found_rows, found_cols) = band.dim();

            match grid {
                None => grid = Some((found_rows, found_cols)),
                Some((expected_rows, expected_cols)) => {
                    if (found_rows, found_cols) != (expected_rows, expected_cols) {
                        return Err(PrismError::GridMismatch {
                            band: band_label(index, path),
                            expected_rows,
                            expected_cols,
                            found_rows,
                            found_cols,
                        });
                    }
                }
            }

            let band = if standardize_bands {
                standardize(&band).map_err(|e| match e {
                    PrismError::DegenerateBand(_) => {
                        PrismError::DegenerateBand(band_label(index, path))
                    }
                    other => other,
                })?
            } else {
                band
            };
            bands.push(band);
        }
    }

    BandStack::from_bands(bands)
}

fn band_label(index: usize, path: &Path) -> String {
    format!("band {index} of {}", path.display())
}
