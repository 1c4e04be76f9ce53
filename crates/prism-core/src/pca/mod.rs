use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{PrismError, Result};

pub mod covariance;
pub mod engine;

pub use covariance::CovarianceAccumulator;
pub use engine::{
    flatten_to_samples, reshape_to_raster, run_pca, run_pca_reported, PcaOutput, PcaParams,
};

/// A fitted full-rank decomposition: one component per input band, ordered
/// by descending explained variance.
#[derive(Clone, Debug)]
pub struct PcaModel {
    /// Per-band mean of the fitted samples.
    pub mean: Array1<f64>,
    /// Eigenvectors of the covariance as columns, in `explained_variance`
    /// order.
    pub components: Array2<f64>,
    /// Eigenvalues of the covariance, descending, clamped at zero.
    pub explained_variance: Array1<f64>,
    /// `explained_variance` normalized to sum to one.
    pub explained_variance_ratio: Array1<f64>,
    /// Sample covariance of the fitted data (bands x bands).
    pub covariance: Array2<f64>,
}

impl PcaModel {
    /// Eigendecompose an accumulated covariance, ordering eigenpairs by
    /// descending eigenvalue (ties broken by ascending original index).
    pub fn from_accumulator(accumulator: CovarianceAccumulator) -> Result<Self> {
        let (_, mean, covariance) = accumulator.finalize()?;
        let n = covariance.nrows();

        let symmetric = DMatrix::from_fn(n, n, |r, c| covariance[[r, c]]);
        let eigen = SymmetricEigen::new(symmetric);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let explained_variance =
            Array1::from_iter(order.iter().map(|&i| eigen.eigenvalues[i].max(0.0)));
        let total = explained_variance.sum();
        if total <= 0.0 {
            return Err(PrismError::Decomposition(
                "total variance is zero".to_string(),
            ));
        }
        let explained_variance_ratio = &explained_variance / total;

        let mut components = Array2::zeros((n, n));
        for (rank, &i) in order.iter().enumerate() {
            for row in 0..n {
                components[[row, rank]] = eigen.eigenvectors[(row, i)];
            }
        }

        Ok(Self {
            mean,
            components,
            explained_variance,
            explained_variance_ratio,
            covariance,
        })
    }

    pub fn n_components(&self) -> usize {
        self.components.ncols()
    }

    /// Project samples onto the components: center by the fitted mean, then
    /// multiply by the eigenvector matrix. Output columns follow the
    /// descending-variance component order.
    pub fn project(&self, samples: ArrayView2<f64>) -> Array2<f64> {
        let centered = &samples - &self.mean;
        centered.dot(&self.components)
    }
}
