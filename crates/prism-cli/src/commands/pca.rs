use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use prism_core::consts::{DEFAULT_OUTPUT_FORMAT, PCA_BATCH_ROWS};
use prism_core::pipeline::{run_pipeline, PipelineConfig};

use crate::summary;

#[derive(Args)]
pub struct PcaArgs {
    /// Input images, registered to the same pixel grid
    #[arg(short, long, num_args = 1.., required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Output file name
    #[arg(short, long, required_unless_present = "config")]
    pub output: Option<PathBuf>,

    /// Output raster format
    #[arg(long = "output-format", default_value = DEFAULT_OUTPUT_FORMAT)]
    pub output_format: String,

    /// Keep raw band values (skip per-band standardization)
    #[arg(long)]
    pub no_standardize: bool,

    /// Pipeline config file (TOML); overrides the other arguments
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &PcaArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig {
            inputs: args.input.clone(),
            output: args.output.clone().context("--output is required")?,
            output_format: args.output_format.clone(),
            standardize: !args.no_standardize,
            batch_rows: PCA_BATCH_ROWS,
        }
    };

    println!(
        "Assembling {} image(s){}",
        config.inputs.len(),
        if config.standardize {
            " with standardization"
        } else {
            ""
        }
    );

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:12} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );

    let output = run_pipeline(&config, |stage, progress| {
        pb.set_message(stage.to_string());
        pb.set_position((progress * 100.0) as u64);
    })?;
    pb.finish_with_message("Done");
    println!();

    summary::print_covariance(&output.covariance);
    summary::print_variance_ratio(&output.explained_variance_ratio);

    println!("Saved to {}", config.output.display());
    Ok(())
}
