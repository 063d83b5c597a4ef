use crate::core::base::*;
use crate::core::optimizer::*;

use log::debug;
use nalgebra::{DMatrix, DVector};

/// Optimizes the multipliers in the span of the principal components of the
/// masked condition intensities. The design and the target are projected
/// once, so an objective evaluation costs `O(r * K)`.
pub struct PcaSpaceOptimizer {
    settings: MinimizerSettings,
    components: Option<usize>,
}

impl PcaSpaceOptimizer {
    /// `components` defaults to the number of conditions.
    pub fn new(settings: MinimizerSettings, components: Option<usize>) -> Self {
        PcaSpaceOptimizer {
            settings,
            components,
        }
    }
}

/// Pixel-space least-squares system restricted to pixels that some mask
/// selects and that are not NaN in every channel. Column `k` holds `I_k` on
/// the pixels of condition `k`; overlapping masks add up.
pub fn masked_design(context: &OptimizationContext) -> (DMatrix<f64>, DVector<f64>) {
    let width = context.map.width();
    let height = context.map.height();
    let n = context.number_of_conditions();
    let intensities = context.intensities();
    let target = context.target_intensity();

    let mut rows: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..height {
        for j in 0..width {
            let index = (i * width + j) as usize;
            if target[index].is_none() {
                continue;
            }
            let selected: Vec<usize> = (0..n)
                .filter(|k| {
                    context
                        .mask(*k)
                        .map(|m| m.is_selected(j, i))
                        .unwrap_or(false)
                })
                .collect();
            if !selected.is_empty() {
                rows.push((index, selected));
            }
        }
    }

    let mut design = DMatrix::zeros(rows.len(), n);
    let mut e = DVector::zeros(rows.len());
    for (r, (index, selected)) in rows.iter().enumerate() {
        for k in selected.iter() {
            design[(r, *k)] += intensities[*k];
        }
        e[r] = target[*index].unwrap_or(0.0);
    }
    return (design, e);
}

/// `f = |A x - c|` with gradient `A^T (A x - c) / f`, zero where `f` is zero.
pub fn projected_residual(a: &DMatrix<f64>, c: &DVector<f64>, x: &[f64], gradient: &mut [f64]) -> f64 {
    let xv = DVector::from_column_slice(x);
    let r = a * xv - c;
    let f = r.norm();
    let g = a.tr_mul(&r);
    for k in 0..gradient.len() {
        gradient[k] = if f > 0.0 { g[k] / f } else { 0.0 };
    }
    return f;
}

impl BasisOptimizer for PcaSpaceOptimizer {
    fn optimize(
        &self,
        context: &OptimizationContext,
        start: &[f64],
    ) -> Result<OptimizationOutcome, LightBasisError> {
        let n = context.number_of_conditions();
        if start.len() != n {
            let msg = format!("Expected {} starting multipliers, got {}", n, start.len());
            return Err(LightBasisError::error(&msg));
        }
        let (design, e) = masked_design(context);
        if design.nrows() == 0 {
            debug!("No masked pixels, multipliers stay at the starting point");
            return Ok(OptimizationOutcome {
                multipliers: start.to_vec(),
                value: 0.0,
                iterations: 0,
                converged: true,
            });
        }

        let pca = PrincipalComponents::new(&design, self.components.unwrap_or(n))?;
        let (a, c) = if pca.number_of_components() == 0 {
            // identical design columns span no variance; solve in pixel space
            debug!("Design has no principal components, using the pixel-space system");
            (design, e)
        } else {
            debug!(
                "Optimizing over {} principal components of {} conditions",
                pca.number_of_components(),
                n
            );
            let u = pca.components();
            (u.tr_mul(&design), u.tr_mul(&e))
        };

        let result = find_min_box_constrained(
            |x: &[f64], g: &mut [f64]| projected_residual(&a, &c, x, g),
            start,
            &self.settings,
        );
        debug!(
            "PCA-space optimization: f = {} after {} iterations",
            result.value, result.iterations
        );
        return Ok(OptimizationOutcome::from_result(result));
    }

    fn carries_solution(&self) -> bool {
        return false;
    }

    fn settings(&self) -> &MinimizerSettings {
        return &self.settings;
    }
}

pub fn create_pca_space_optimizer(settings: &MinimizerSettings, components: Option<usize>) -> Box<dyn BasisOptimizer> {
    return Box::new(PcaSpaceOptimizer::new(*settings, components));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::raster::*;

    fn scene() -> (FloatImage, ConditionMask, ConditionMask) {
        let mut map = FloatImage::constant(4, 3, &[1.0; 3]);
        let mut left = ConditionMask::new(4, 3);
        let mut right = ConditionMask::new(4, 3);
        for y in 0..3 {
            map.set(2, y, &[4.0; 3]);
            map.set(3, y, &[4.0; 3]);
            left.set(0, y, true);
            left.set(1, y, true);
            right.set(2, y, true);
            right.set(3, y, true);
        }
        map.set(0, 1, &[Float::NAN; 3]);
        return (map, left, right);
    }

    #[test]
    fn test_001() {
        let (map, left, right) = scene();
        let weights = vec![[2.0; 3], [1.0; 3]];
        let context = OptimizationContext::new(&map, vec![Some(&left), Some(&right)], &weights, 0.0);
        let (design, e) = masked_design(&context);
        // 12 pixels, one of them NaN
        assert_eq!(design.nrows(), 11);
        assert_eq!(e.len(), 11);
        for r in 0..design.nrows() {
            let row_sum: f64 = design.row(r).iter().sum();
            assert!(row_sum == 2.0 || row_sum == 1.0);
        }
    }

    #[test]
    fn test_002() {
        let (map, left, right) = scene();
        let weights = vec![[1.0; 3], [1.0; 3]];
        let context = OptimizationContext::new(&map, vec![Some(&left), Some(&right)], &weights, 0.0);
        let optimizer = PcaSpaceOptimizer::new(MinimizerSettings::default(), None);
        let a = optimizer.optimize(&context, &[1.0, 1.0]).unwrap();
        let b = optimizer.optimize(&context, &[1.0, 1.0]).unwrap();
        assert_eq!(a, b);
        for x in a.multipliers.iter() {
            assert!(*x >= 0.0 && *x <= 10.0);
        }
        assert!(!optimizer.carries_solution());
        assert!(a.value.is_finite());
    }

    #[test]
    fn test_003() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 2.0]);
        let c = DVector::from_column_slice(&[1.0, 2.0]);
        let mut g = vec![0.0; 2];
        assert_eq!(projected_residual(&a, &c, &[1.0, 1.0], &mut g), 0.0);
        assert_eq!(g, vec![0.0, 0.0]);
        let f = projected_residual(&a, &c, &[2.0, 1.0], &mut g);
        assert!((f - 1.0).abs() < 1e-12);
        assert!((g[0] - 1.0).abs() < 1e-12);
        assert_eq!(g[1], 0.0);
    }
}
