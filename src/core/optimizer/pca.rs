use crate::core::base::*;

use nalgebra::{DMatrix, DVector, SymmetricEigen};

const RELATIVE_EIGENVALUE_CUTOFF: f64 = 1e-12;

/// Principal axes of a set of observations stored as the columns of a
/// `dimension x count` matrix.
#[derive(Debug, Clone)]
pub struct PrincipalComponents {
    mean: DVector<f64>,
    /// Orthonormal axes as columns, ordered by decreasing variance.
    components: DMatrix<f64>,
    eigenvalues: Vec<f64>,
}

impl PrincipalComponents {
    /// Computes up to `max_components` axes. The covariance is diagonalized in
    /// the `count x count` snapshot space, so the cost does not grow with the
    /// number of pixels beyond one matrix product. Axes with a negligible
    /// variance are dropped.
    pub fn new(observations: &DMatrix<f64>, max_components: usize) -> Result<Self, LightBasisError> {
        let dimension = observations.nrows();
        let count = observations.ncols();
        if dimension == 0 || count == 0 {
            return Err(LightBasisError::error("No observations to analyze"));
        }
        let mean = observations.column_mean();
        let mut centered = observations.clone();
        for mut column in centered.column_iter_mut() {
            column -= &mean;
        }

        let gram = centered.transpose() * &centered;
        let eigen = SymmetricEigen::new(gram);
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by(|a, b| {
            eigen.eigenvalues[*b]
                .partial_cmp(&eigen.eigenvalues[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let largest = order.first().map(|i| eigen.eigenvalues[*i]).unwrap_or(0.0);
        let cutoff = largest.max(0.0) * RELATIVE_EIGENVALUE_CUTOFF;
        let mut axes = Vec::new();
        let mut eigenvalues = Vec::new();
        for i in order.into_iter() {
            if axes.len() >= max_components {
                break;
            }
            let lambda = eigen.eigenvalues[i];
            if lambda <= cutoff || lambda <= 0.0 {
                continue;
            }
            let axis = (&centered * eigen.eigenvectors.column(i)) / lambda.sqrt();
            axes.push(axis);
            eigenvalues.push(lambda);
        }
        let components = if axes.is_empty() {
            DMatrix::zeros(dimension, 0)
        } else {
            DMatrix::from_columns(&axes)
        };
        return Ok(PrincipalComponents {
            mean,
            components,
            eigenvalues,
        });
    }

    #[inline]
    pub fn number_of_components(&self) -> usize {
        return self.components.ncols();
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        return self.mean.len();
    }

    #[inline]
    pub fn mean(&self) -> &DVector<f64> {
        return &self.mean;
    }

    #[inline]
    pub fn components(&self) -> &DMatrix<f64> {
        return &self.components;
    }

    #[inline]
    pub fn eigenvalues(&self) -> &[f64] {
        return &self.eigenvalues;
    }

    /// Coordinates of `v` along the axes, relative to the mean.
    pub fn project(&self, v: &DVector<f64>) -> DVector<f64> {
        return self.components.tr_mul(&(v - &self.mean));
    }

    pub fn reconstruct(&self, coefficients: &DVector<f64>) -> DVector<f64> {
        return &self.mean + &self.components * coefficients;
    }

    /// Same analysis restricted to the leading `count` axes.
    pub fn truncated(&self, count: usize) -> PrincipalComponents {
        let count = count.min(self.number_of_components());
        return PrincipalComponents {
            mean: self.mean.clone(),
            components: self.components.columns(0, count).into_owned(),
            eigenvalues: self.eigenvalues[..count].to_vec(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations() -> DMatrix<f64> {
        return DMatrix::from_column_slice(
            5,
            4,
            &[
                1.0, 0.0, 2.0, 0.0, 1.0, //
                0.0, 3.0, 1.0, 1.0, 0.0, //
                2.0, 1.0, 0.0, 4.0, 1.0, //
                1.0, 1.0, 1.0, 0.0, 5.0, //
            ],
        );
    }

    fn reconstruction_error(pca: &PrincipalComponents, data: &DMatrix<f64>) -> f64 {
        let mut error = 0.0;
        for column in data.column_iter() {
            let v = column.into_owned();
            let r = pca.reconstruct(&pca.project(&v));
            error += (r - v).norm_squared();
        }
        return error;
    }

    #[test]
    fn test_001() {
        let data = observations();
        let pca = PrincipalComponents::new(&data, 10).unwrap();
        // four centered observations span at most three directions
        assert_eq!(pca.number_of_components(), 3);
        let gram = pca.components().tr_mul(pca.components());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[(i, j)] - expected).abs() < 1e-9);
            }
        }
        for w in pca.eigenvalues().windows(2) {
            assert!(w[0] >= w[1]);
        }
    }

    #[test]
    fn test_002() {
        let data = observations();
        let pca = PrincipalComponents::new(&data, 10).unwrap();
        let mut previous = f64::INFINITY;
        for r in 0..=pca.number_of_components() {
            let error = reconstruction_error(&pca.truncated(r), &data);
            assert!(error <= previous + 1e-9);
            previous = error;
        }
        assert!(previous < 1e-9);
    }

    #[test]
    fn test_003() {
        let constant = DMatrix::from_element(3, 2, 1.5);
        let pca = PrincipalComponents::new(&constant, 2).unwrap();
        assert_eq!(pca.number_of_components(), 0);
        let v = DVector::from_element(3, 1.5);
        assert_eq!(pca.reconstruct(&pca.project(&v)), v);
        assert!(PrincipalComponents::new(&DMatrix::zeros(0, 0), 1).is_err());
    }
}
