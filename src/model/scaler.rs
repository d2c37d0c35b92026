//! Feature standardization using training-time statistics.

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::layout::FEATURE_COUNT;

/// Per-feature zero-mean / unit-variance scaler.
///
/// Only exists in the fitted state: construct it with [`StandardScaler::fit`]
/// over the training split, or deserialize a fitted artifact. Statistics use
/// the population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-feature mean and standard deviation over `rows`.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> ModelResult<Self> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let n = rows.len() as f64;

        let mut means = vec![0.0; FEATURE_COUNT];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row.iter()) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; FEATURE_COUNT];
        for row in rows {
            for ((std, value), mean) in stds.iter_mut().zip(row.iter()).zip(means.iter()) {
                let d = value - mean;
                *std += d * d;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
        }

        Ok(Self { means, stds })
    }

    /// Standardize one feature vector. Zero-variance features map to 0.
    pub fn transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            if self.stds[i] != 0.0 {
                out[i] = (values[i] - self.means[i]) / self.stds[i];
            }
        }
        out
    }

    /// Standardize a batch of rows.
    pub fn transform_rows(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    /// Guard against artifacts fitted on a different feature width.
    pub fn check_width(&self) -> ModelResult<()> {
        if self.means.len() != FEATURE_COUNT || self.stds.len() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: self.means.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: f64) -> [f64; FEATURE_COUNT] {
        let mut r = [0.0; FEATURE_COUNT];
        r[0] = value;
        r[1] = 1.0; // constant column
        r
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_fit_statistics() {
        let rows = vec![row(2.0), row(4.0), row(6.0)];
        let scaler = StandardScaler::fit(&rows).unwrap();
        // mean 4, population variance ((4)+(0)+(4))/3 = 8/3
        assert!((scaler.means[0] - 4.0).abs() < 1e-12);
        assert!((scaler.stds[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_transform_centers_and_scales() {
        let rows = vec![row(2.0), row(4.0), row(6.0)];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let transformed = scaler.transform_rows(&rows);
        let mean: f64 = transformed.iter().map(|r| r[0]).sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        // middle value sits exactly on the mean
        assert!(transformed[1][0].abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_maps_to_zero() {
        let rows = vec![row(2.0), row(4.0)];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let out = scaler.transform(&row(3.0));
        assert_eq!(out[1], 0.0);
    }
}
