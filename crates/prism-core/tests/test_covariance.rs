use approx::assert_abs_diff_eq;
use ndarray::{array, Array2, Axis};

use prism_core::pca::CovarianceAccumulator;

fn sample_data(n: usize, k: usize) -> Array2<f64> {
    // Deterministic, non-degenerate data with correlated columns.
    Array2::from_shape_fn((n, k), |(i, j)| {
        let x = i as f64;
        let phase = (j + 1) as f64;
        (x * 0.37 * phase).sin() * 10.0 + x * 0.01 * phase
    })
}

fn accumulate(data: &Array2<f64>, batch_rows: usize) -> Array2<f64> {
    let mut acc = CovarianceAccumulator::new(data.ncols());
    for batch in data.axis_chunks_iter(Axis(0), batch_rows) {
        acc.update(batch);
    }
    let (count, _, covariance) = acc.finalize().unwrap();
    assert_eq!(count, data.nrows());
    covariance
}

#[test]
fn test_known_small_case() {
    let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    let mut acc = CovarianceAccumulator::new(2);
    acc.update(data.view());
    let (count, mean, covariance) = acc.finalize().unwrap();

    assert_eq!(count, 3);
    assert_abs_diff_eq!(mean[0], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(mean[1], 4.0, epsilon = 1e-12);
    for value in covariance.iter() {
        assert_abs_diff_eq!(*value, 4.0, epsilon = 1e-12);
    }
}

#[test]
fn test_batched_matches_single_pass() {
    let data = sample_data(100, 3);
    let reference = accumulate(&data, 100);

    for batch_rows in [1, 7, 32, 99] {
        let batched = accumulate(&data, batch_rows);
        for (a, b) in batched.iter().zip(reference.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_mean_matches_direct_computation() {
    let data = sample_data(57, 2);
    let mut acc = CovarianceAccumulator::new(2);
    for batch in data.axis_chunks_iter(Axis(0), 10) {
        acc.update(batch);
    }
    let (_, mean, _) = acc.finalize().unwrap();
    let direct = data.mean_axis(Axis(0)).unwrap();
    assert_abs_diff_eq!(mean[0], direct[0], epsilon = 1e-12);
    assert_abs_diff_eq!(mean[1], direct[1], epsilon = 1e-12);
}

#[test]
fn test_empty_batches_are_ignored() {
    let data = sample_data(10, 2);
    let mut acc = CovarianceAccumulator::new(2);
    acc.update(data.slice(ndarray::s![0..0, ..]));
    acc.update(data.view());
    acc.update(data.slice(ndarray::s![0..0, ..]));
    let (count, _, _) = acc.finalize().unwrap();
    assert_eq!(count, 10);
}

#[test]
fn test_too_few_samples_error() {
    let mut acc = CovarianceAccumulator::new(2);
    acc.update(array![[1.0, 2.0]].view());
    assert!(acc.finalize().is_err());
}
