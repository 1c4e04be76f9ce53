/// Number of pixel samples folded into the covariance accumulator per batch.
/// At 8 bands of f64, 65536 samples is about 4 MB per batch.
pub const PCA_BATCH_ROWS: usize = 65_536;

/// Standard deviation at or below which a band is treated as constant.
pub const STD_EPSILON: f64 = 1e-12;

/// Raster driver used when no output format is given.
pub const DEFAULT_OUTPUT_FORMAT: &str = "gtiff";
