use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{PrismError, Result};

/// Streaming accumulator for the mean and covariance of row samples.
///
/// Batches merge through the pairwise update of Chan et al., so the full
/// sample matrix never has to be resident: memory is bounded by one batch
/// plus the (bands x bands) comoment.
#[derive(Clone, Debug)]
pub struct CovarianceAccumulator {
    count: usize,
    mean: Array1<f64>,
    comoment: Array2<f64>,
}

impl CovarianceAccumulator {
    pub fn new(n_features: usize) -> Self {
        Self {
            count: 0,
            mean: Array1::zeros(n_features),
            comoment: Array2::zeros((n_features, n_features)),
        }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Samples folded in so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Fold one batch of rows into the running statistics.
    pub fn update(&mut self, batch: ArrayView2<f64>) {
        let batch_count = batch.nrows();
        if batch_count == 0 {
            return;
        }
        debug_assert_eq!(batch.ncols(), self.n_features());

        let batch_mean = batch.mean_axis(Axis(0)).expect("batch is non-empty");
        let centered = &batch - &batch_mean;
        let batch_comoment = centered.t().dot(&centered);

        if self.count == 0 {
            self.count = batch_count;
            self.mean = batch_mean;
            self.comoment = batch_comoment;
            return;
        }

        let n_a = self.count as f64;
        let n_b = batch_count as f64;
        let n = n_a + n_b;

        let delta = &batch_mean - &self.mean;
        let delta_col = delta.view().insert_axis(Axis(1));
        let delta_row = delta.view().insert_axis(Axis(0));
        let cross = delta_col.dot(&delta_row) * (n_a * n_b / n);

        self.comoment += &batch_comoment;
        self.comoment += &cross;
        self.mean.scaled_add(n_b / n, &delta);
        self.count += batch_count;
    }

    /// Finish accumulation, yielding the sample count, mean vector, and
    /// sample covariance (divisor count - 1).
    pub fn finalize(self) -> Result<(usize, Array1<f64>, Array2<f64>)> {
        if self.count < 2 {
            return Err(PrismError::Decomposition(format!(
                "{} sample(s) accumulated, need at least 2 for a covariance",
                self.count
            )));
        }
        let covariance = self.comoment / (self.count - 1) as f64;
        Ok((self.count, self.mean, covariance))
    }
}
