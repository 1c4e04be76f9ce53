use approx::assert_abs_diff_eq;
use ndarray::Array3;
use tempfile::TempDir;

use prism_core::error::PrismError;
use prism_core::raster::{self, GeoTiffOpener, RasterGeometry, RasterOpener, RasterSource};

fn utm_geometry(rows: usize, cols: usize) -> RasterGeometry {
    RasterGeometry {
        rows,
        cols,
        pixel_scale: Some(vec![30.0, 30.0, 0.0]),
        tiepoint: Some(vec![0.0, 0.0, 0.0, 399_960.0, 7_790_220.0, 0.0]),
        geo_keys: Some(vec![1, 1, 0, 2, 1024, 0, 1, 1, 1025, 0, 1, 1]),
        geo_ascii: Some("WGS 84 / UTM zone 33N|".to_string()),
    }
}

#[test]
fn test_write_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stack.tif");

    let data = Array3::from_shape_fn((3, 4, 5), |(b, r, c)| (b * 100 + r * 10 + c) as f64);
    raster::write_raster(&path, "gtiff", data.view(), &utm_geometry(4, 5)).unwrap();

    let mut source = GeoTiffOpener.open(&path).unwrap();
    assert_eq!(source.band_count(), 3);
    assert_eq!(source.geometry().rows, 4);
    assert_eq!(source.geometry().cols, 5);

    for index in 1..=3 {
        let band = source.read_band(index).unwrap();
        assert_eq!(band.dim(), (4, 5));
        for r in 0..4 {
            for c in 0..5 {
                // Bands are stored as f32; these values are exact in f32.
                assert_abs_diff_eq!(band[[r, c]], data[[index - 1, r, c]], epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_georeferencing_survives_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("georef.tif");

    let expected = utm_geometry(2, 2);
    let data = Array3::from_elem((1, 2, 2), 1.0);
    raster::write_raster(&path, "gtiff", data.view(), &expected).unwrap();

    let source = GeoTiffOpener.open(&path).unwrap();
    let geometry = source.geometry();
    assert!(geometry.is_georeferenced());
    assert_eq!(geometry.pixel_scale, expected.pixel_scale);
    assert_eq!(geometry.tiepoint, expected.tiepoint);
    assert_eq!(geometry.geo_keys, expected.geo_keys);
    assert_eq!(
        geometry.geo_ascii.as_deref().map(|s| s.trim_end_matches('\0')),
        expected.geo_ascii.as_deref()
    );
}

#[test]
fn test_single_band_convenience_writer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("band.tif");

    let data = ndarray::Array2::from_shape_fn((3, 3), |(r, c)| (r * 3 + c) as f64);
    raster::write_raster_band(&path, "tif", data.view(), &RasterGeometry::default()).unwrap();

    let mut source = GeoTiffOpener.open(&path).unwrap();
    assert_eq!(source.band_count(), 1);
    let band = source.read_band(1).unwrap();
    assert_abs_diff_eq!(band[[2, 2]], 8.0, epsilon = 1e-6);
}

#[test]
fn test_unknown_driver_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.kea");

    let data = Array3::from_elem((1, 2, 2), 0.0);
    let err =
        raster::write_raster(&path, "kea", data.view(), &RasterGeometry::default()).unwrap_err();
    assert!(matches!(err, PrismError::UnsupportedFormat(_)));
    assert!(!path.exists(), "nothing must be written for a bad driver");
}

#[test]
fn test_missing_file_is_not_found() {
    let err = GeoTiffOpener
        .open(std::path::Path::new("/nonexistent/raster.tif"))
        .unwrap_err();
    assert!(matches!(err, PrismError::NotFound(_)));
}

#[test]
fn test_band_index_bounds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.tif");

    let data = Array3::from_elem((1, 2, 2), 5.0);
    raster::write_raster(&path, "gtiff", data.view(), &RasterGeometry::default()).unwrap();

    let mut source = GeoTiffOpener.open(&path).unwrap();
    assert!(matches!(
        source.read_band(0).unwrap_err(),
        PrismError::BandIndexOutOfRange { .. }
    ));
    assert!(matches!(
        source.read_band(2).unwrap_err(),
        PrismError::BandIndexOutOfRange { .. }
    ));
}
