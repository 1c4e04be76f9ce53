use ndarray::Array2;

use crate::consts::STD_EPSILON;
use crate::error::{PrismError, Result};

/// Center and scale a band by its global mean and population standard
/// deviation, computed over every pixel of the band.
///
/// A constant band has no scale; it is rejected here instead of letting a
/// division by zero spread NaN/inf through the stack.
pub fn standardize(band: &Array2<f64>) -> Result<Array2<f64>> {
    let mean = band
        .mean()
        .ok_or_else(|| PrismError::DegenerateBand("empty band".to_string()))?;
    let std = band.std(0.0);
    if std <= STD_EPSILON {
        return Err(PrismError::DegenerateBand("band".to_string()));
    }
    Ok(band.mapv(|v| (v - mean) / std))
}
