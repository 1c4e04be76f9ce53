use std::fmt;
use std::path::PathBuf;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{DEFAULT_OUTPUT_FORMAT, PCA_BATCH_ROWS};
use crate::error::Result;
use crate::pca::engine::run_pca_reported;
use crate::pca::PcaParams;
use crate::raster::{self, GeoTiffOpener, RasterOpener, RasterSource};
use crate::stack::assemble_stack;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input rasters, in band-stack order.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Output driver name; only "gtiff" is built in.
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Standardize each band before stacking.
    #[serde(default = "default_standardize")]
    pub standardize: bool,
    /// Pixel samples per covariance batch.
    #[serde(default = "default_batch_rows")]
    pub batch_rows: usize,
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_standardize() -> bool {
    true
}

fn default_batch_rows() -> usize {
    PCA_BATCH_ROWS
}

/// Summary artifacts of one run, for the caller to print or inspect.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub covariance: Array2<f64>,
    pub explained_variance_ratio: Array1<f64>,
}

/// Stage reported to the progress callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Assemble,
    Fit,
    Write,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Assemble => "Assembling",
            PipelineStage::Fit => "Fitting",
            PipelineStage::Write => "Writing",
        };
        f.write_str(name)
    }
}

/// Run the whole batch: assemble the band stack, decompose, and write the
/// transformed raster with the first input's georeferencing.
///
/// No output file is written unless every earlier stage succeeds.
/// `on_progress` is called with (stage, fraction_complete).
pub fn run_pipeline<F>(config: &PipelineConfig, mut on_progress: F) -> Result<PipelineOutput>
where
    F: FnMut(PipelineStage, f32),
{
    let opener = GeoTiffOpener;

    on_progress(PipelineStage::Assemble, 0.0);
    info!(
        inputs = config.inputs.len(),
        standardize = config.standardize,
        "Assembling band stack"
    );
    let stack = assemble_stack(&opener, &config.inputs, config.standardize)?;
    info!(
        bands = stack.n_bands(),
        rows = stack.rows(),
        cols = stack.cols(),
        "Stack assembled"
    );
    on_progress(PipelineStage::Assemble, 1.0);

    let params = PcaParams {
        batch_rows: config.batch_rows,
    };
    let result = run_pca_reported(&stack, &params, |fraction| {
        on_progress(PipelineStage::Fit, fraction);
    })?;

    on_progress(PipelineStage::Write, 0.0);
    // Georeferencing comes from the first input, the prototype raster.
    let geometry = opener.open(&config.inputs[0])?.geometry().clone();
    raster::write_raster(
        &config.output,
        &config.output_format,
        result.transformed.data.view(),
        &geometry,
    )?;
    info!(output = %config.output.display(), "Transformed raster written");
    on_progress(PipelineStage::Write, 1.0);

    Ok(PipelineOutput {
        covariance: result.covariance,
        explained_variance_ratio: result.explained_variance_ratio,
    })
}
