use ndarray::{Array1, Array2, Array3, Axis};
use tracing::debug;

use crate::consts::PCA_BATCH_ROWS;
use crate::error::{PrismError, Result};
use crate::stack::BandStack;

use super::{CovarianceAccumulator, PcaModel};

/// Tuning for the covariance fit.
#[derive(Clone, Debug)]
pub struct PcaParams {
    /// Pixel samples folded into the accumulator per batch.
    pub batch_rows: usize,
}

impl Default for PcaParams {
    fn default() -> Self {
        Self {
            batch_rows: PCA_BATCH_ROWS,
        }
    }
}

/// Everything one decomposition run produces.
#[derive(Clone, Debug)]
pub struct PcaOutput {
    /// Input geometry with channels reordered by descending explained
    /// variance.
    pub transformed: BandStack,
    pub covariance: Array2<f64>,
    pub explained_variance_ratio: Array1<f64>,
}

/// View the stack as one row per pixel, one column per band.
///
/// (bands, rows, cols) reshapes row-major to (bands, rows*cols), then
/// transposes: pixel (r, c) of band b lands in sample row r*cols + c,
/// column b. The transposition direction is what makes pixels the samples
/// and bands the features.
pub fn flatten_to_samples(stack: &Array3<f64>) -> Array2<f64> {
    let (bands, rows, cols) = stack.dim();
    let canonical = stack.as_standard_layout();
    let flat = canonical
        .view()
        .into_shape_with_order((bands, rows * cols))
        .expect("standard-layout stack reshapes to (bands, pixels)");
    flat.t().as_standard_layout().to_owned()
}

/// Exact inverse of [`flatten_to_samples`]: sample row r*cols + c returns to
/// pixel (r, c) of every output band.
pub fn reshape_to_raster(samples: Array2<f64>, rows: usize, cols: usize) -> Array3<f64> {
    let bands = samples.ncols();
    samples
        .t()
        .as_standard_layout()
        .to_owned()
        .into_shape_with_order((bands, rows, cols))
        .expect("sample count matches the raster geometry")
}

/// Fit a full-rank covariance PCA over the stack's pixels and project the
/// stack onto the derived components.
pub fn run_pca(stack: &BandStack, params: &PcaParams) -> Result<PcaOutput> {
    run_pca_reported(stack, params, |_| {})
}

/// [`run_pca`] with a progress callback, called with the fraction of
/// covariance batches folded in.
pub fn run_pca_reported<F>(stack: &BandStack, params: &PcaParams, mut on_progress: F) -> Result<PcaOutput>
where
    F: FnMut(f32),
{
    let (bands, rows, cols) = stack.data.dim();
    if bands == 0 {
        return Err(PrismError::Decomposition(
            "no bands to decompose".to_string(),
        ));
    }
    let sample_count = rows * cols;
    if sample_count < bands {
        return Err(PrismError::Decomposition(format!(
            "{sample_count} pixel(s) for {bands} band(s): decomposition is underdetermined"
        )));
    }

    let samples = flatten_to_samples(&stack.data);

    let batch_rows = params.batch_rows.max(1);
    let total_batches = sample_count.div_ceil(batch_rows);
    let mut accumulator = CovarianceAccumulator::new(bands);
    for (batch_index, batch) in samples.axis_chunks_iter(Axis(0), batch_rows).enumerate() {
        accumulator.update(batch);
        on_progress((batch_index + 1) as f32 / total_batches as f32);
    }
    debug!(samples = accumulator.count(), bands, "Covariance accumulated");

    let model = PcaModel::from_accumulator(accumulator)?;
    let projected = model.project(samples.view());

    Ok(PcaOutput {
        transformed: BandStack {
            data: reshape_to_raster(projected, rows, cols),
        },
        covariance: model.covariance,
        explained_variance_ratio: model.explained_variance_ratio,
    })
}
