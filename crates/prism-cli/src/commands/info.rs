use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prism_core::raster::{GeoTiffOpener, RasterOpener, RasterSource};

#[derive(Args)]
pub struct InfoArgs {
    /// Input raster file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let opener = GeoTiffOpener;
    let source = opener.open(&args.file)?;
    let geometry = source.geometry();

    println!("File:        {}", args.file.display());
    println!("Bands:       {}", source.band_count());
    println!("Dimensions:  {}x{}", geometry.cols, geometry.rows);

    if let Some(scale) = geometry.pixel_scale.as_deref() {
        if scale.len() >= 2 {
            println!("Pixel size:  {} x {}", scale[0], scale[1]);
        }
    }
    if let Some(tiepoint) = geometry.tiepoint.as_deref() {
        if tiepoint.len() >= 6 {
            println!("Origin:      ({}, {})", tiepoint[3], tiepoint[4]);
        }
    }
    if let Some(ref ascii) = geometry.geo_ascii {
        println!("Projection:  {}", ascii.trim_end_matches('|'));
    }
    if !geometry.is_georeferenced() {
        println!("Georef:      none");
    }

    let pixels = geometry.rows * geometry.cols * source.band_count();
    let total_mb = (pixels * std::mem::size_of::<f64>()) as f64 / (1024.0 * 1024.0);
    println!("Stack size:  {:.1} MB decoded", total_mb);

    Ok(())
}
