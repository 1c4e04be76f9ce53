use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView3};
use num_traits::ToPrimitive;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

use crate::error::{PrismError, Result};

use super::{RasterGeometry, RasterOpener, RasterSource};

// GeoTIFF tags the tiff crate has no names for.
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_ASCII_PARAMS: u16 = 34737;

/// GeoTIFF-backed [`RasterSource`]. Each grayscale IFD is one band, the
/// layout the matching writer produces.
pub struct GeoTiffSource {
    decoder: Decoder<BufReader<File>>,
    path: PathBuf,
    band_count: usize,
    geometry: RasterGeometry,
}

impl std::fmt::Debug for GeoTiffSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoTiffSource")
            .field("path", &self.path)
            .field("band_count", &self.band_count)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl GeoTiffSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrismError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let mut decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| format_error(path, e))?;

        let geometry = read_geometry(&mut decoder).map_err(|e| format_error(path, e))?;

        let mut band_count = 1;
        while decoder.more_images() {
            decoder.next_image().map_err(|e| format_error(path, e))?;
            band_count += 1;
        }
        decoder.seek_to_image(0).map_err(|e| format_error(path, e))?;

        Ok(Self {
            decoder,
            path: path.to_path_buf(),
            band_count,
            geometry,
        })
    }
}

impl RasterSource for GeoTiffSource {
    fn band_count(&self) -> usize {
        self.band_count
    }

    fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    fn read_band(&mut self, index: usize) -> Result<Array2<f64>> {
        if index == 0 || index > self.band_count {
            return Err(PrismError::BandIndexOutOfRange {
                index,
                total: self.band_count,
            });
        }
        self.decoder
            .seek_to_image(index - 1)
            .map_err(|e| format_error(&self.path, e))?;

        let (width, height) = self
            .decoder
            .dimensions()
            .map_err(|e| format_error(&self.path, e))?;
        let (rows, cols) = (height as usize, width as usize);

        let buf = match self
            .decoder
            .read_image()
            .map_err(|e| format_error(&self.path, e))?
        {
            DecodingResult::U8(buf) => to_f64_pixels(buf),
            DecodingResult::U16(buf) => to_f64_pixels(buf),
            DecodingResult::U32(buf) => to_f64_pixels(buf),
            DecodingResult::U64(buf) => to_f64_pixels(buf),
            DecodingResult::I8(buf) => to_f64_pixels(buf),
            DecodingResult::I16(buf) => to_f64_pixels(buf),
            DecodingResult::I32(buf) => to_f64_pixels(buf),
            DecodingResult::I64(buf) => to_f64_pixels(buf),
            DecodingResult::F32(buf) => to_f64_pixels(buf),
            DecodingResult::F64(buf) => buf,
        };

        if buf.len() != rows * cols {
            return Err(PrismError::Format {
                path: self.path.clone(),
                reason: format!(
                    "unsupported sample layout in band {index}: {} samples for {} pixels",
                    buf.len(),
                    rows * cols
                ),
            });
        }

        Ok(Array2::from_shape_vec((rows, cols), buf).expect("length checked against shape"))
    }
}

/// Opener for file-backed GeoTIFF sources.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoTiffOpener;

impl RasterOpener for GeoTiffOpener {
    type Source = GeoTiffSource;

    fn open(&self, path: &Path) -> Result<GeoTiffSource> {
        GeoTiffSource::open(path)
    }
}

/// Write each band of a (bands, rows, cols) array as one Gray32Float IFD,
/// with the prototype's georeferencing tags on the first IFD.
pub fn write_geotiff(path: &Path, data: ArrayView3<f64>, geometry: &RasterGeometry) -> Result<()> {
    let (bands, rows, cols) = data.dim();
    if bands == 0 || rows == 0 || cols == 0 {
        return Err(PrismError::EmptyStack);
    }

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;

    for (position, band) in data.outer_iter().enumerate() {
        let mut image = encoder.new_image::<Gray32Float>(cols as u32, rows as u32)?;
        if position == 0 {
            write_geo_tags(image.encoder(), geometry)?;
        }
        let pixels: Vec<f32> = band.iter().map(|&v| v as f32).collect();
        image.write_data(&pixels)?;
    }

    Ok(())
}

fn write_geo_tags<W: Write + Seek, K: TiffKind>(
    encoder: &mut DirectoryEncoder<W, K>,
    geometry: &RasterGeometry,
) -> Result<()> {
    if let Some(ref scale) = geometry.pixel_scale {
        encoder.write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), scale.as_slice())?;
    }
    if let Some(ref tiepoint) = geometry.tiepoint {
        encoder.write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), tiepoint.as_slice())?;
    }
    if let Some(ref keys) = geometry.geo_keys {
        encoder.write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), keys.as_slice())?;
    }
    if let Some(ref ascii) = geometry.geo_ascii {
        encoder.write_tag(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS), ascii.as_str())?;
    }
    Ok(())
}

fn read_geometry<R: std::io::Read + Seek>(
    decoder: &mut Decoder<R>,
) -> tiff::TiffResult<RasterGeometry> {
    let (width, height) = decoder.dimensions()?;

    let pixel_scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok();
    let tiepoint = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT)).ok();
    let geo_keys = decoder
        .get_tag_u32_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
        .ok()
        .map(|keys| keys.into_iter().map(|k| k as u16).collect());
    let geo_ascii = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS))
        .ok();

    Ok(RasterGeometry {
        rows: height as usize,
        cols: width as usize,
        pixel_scale,
        tiepoint,
        geo_keys,
        geo_ascii,
    })
}

fn to_f64_pixels<T: ToPrimitive>(buf: Vec<T>) -> Vec<f64> {
    buf.into_iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect()
}

fn format_error(path: &Path, error: tiff::TiffError) -> PrismError {
    PrismError::Format {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}
