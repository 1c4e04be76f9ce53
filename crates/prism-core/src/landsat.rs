use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrismError, Result};

/// Locate the band files of a Landsat scene next to its MTL file.
///
/// A scene directory holds one single-band `*_B<n>.TIF` file per band, with
/// the MTL sidecar anchoring the directory. The band number must match
/// exactly, so asking for band 1 never picks up `B14`. Paths come back in
/// the order of `bands`.
pub fn band_files(mtl_path: &Path, bands: &[u32]) -> Result<Vec<PathBuf>> {
    let dir = match mtl_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut found: Vec<(u32, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(number) = band_number(name) {
            if bands.contains(&number) {
                found.push((number, path));
            }
        }
    }

    let mut files = Vec::with_capacity(found.len());
    for &band in bands {
        for (number, path) in &found {
            if *number == band {
                files.push(path.clone());
            }
        }
    }

    if files.is_empty() {
        return Err(PrismError::Format {
            path: mtl_path.to_path_buf(),
            reason: "no band files matched next to this MTL file".to_string(),
        });
    }
    Ok(files)
}

/// Output name convention: `..._MTL.txt` becomes `..._stack.tif`.
pub fn default_output(mtl_path: &Path) -> PathBuf {
    let name = mtl_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("stack");
    let output = match name.strip_suffix("MTL.txt") {
        Some(prefix) => format!("{prefix}stack.tif"),
        None => format!("{name}.stack.tif"),
    };
    mtl_path.with_file_name(output)
}

/// Parse the `_B<n>.TIF` suffix of a Landsat band file name.
fn band_number(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();
    let stem = upper.strip_suffix(".TIF")?;
    let (_, tail) = stem.rsplit_once("_B")?;
    if tail.is_empty() {
        return None;
    }
    tail.parse().ok()
}
