use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prism_core::landsat;
use prism_core::raster::{self, GeoTiffOpener, RasterOpener, RasterSource};
use prism_core::stack::assemble_stack;

#[derive(Args)]
pub struct StackArgs {
    /// MTL.txt file of the Landsat scene
    #[arg(short, long)]
    pub input: PathBuf,

    /// Band numbers to stack
    #[arg(short, long, num_args = 1.., default_values_t = [1u32, 2, 3, 4, 5, 6, 7, 8])]
    pub bands: Vec<u32>,

    /// Output file path (default: derived from the MTL name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let files = landsat::band_files(&args.input, &args.bands)?;
    println!("Stacking {} band file(s)", files.len());

    let opener = GeoTiffOpener;
    let stack = assemble_stack(&opener, &files, false)?;

    let geometry = opener.open(&files[0])?.geometry().clone();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| landsat::default_output(&args.input));
    raster::write_raster(&output, "gtiff", stack.data.view(), &geometry)?;

    println!("Saved to {}", output.display());
    Ok(())
}
