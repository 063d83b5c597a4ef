use crate::core::base::*;
use crate::core::optimizer::*;

use log::debug;

/// Optimizes the multipliers against every masked pixel on each objective
/// evaluation.
pub struct OriginalSpaceOptimizer {
    settings: MinimizerSettings,
}

impl OriginalSpaceOptimizer {
    pub fn new(settings: MinimizerSettings) -> Self {
        OriginalSpaceOptimizer { settings }
    }
}

/// Objective over the masked pixels of every condition:
/// `f = sqrt(sum_k sum_p (x_k * I_k - e_p)^2)`. The gradient is zero where
/// `f` is zero.
pub fn masked_residual(intensities: &[f64], targets: &[Vec<f64>], x: &[f64], gradient: &mut [f64]) -> f64 {
    let mut sum = 0.0;
    for k in 0..x.len() {
        let predicted = x[k] * intensities[k];
        let mut partial = 0.0;
        for e in targets[k].iter() {
            let r = predicted - e;
            sum += r * r;
            partial += r;
        }
        gradient[k] = intensities[k] * partial;
    }
    let f = sum.sqrt();
    for g in gradient.iter_mut() {
        *g = if f > 0.0 { *g / f } else { 0.0 };
    }
    return f;
}

impl BasisOptimizer for OriginalSpaceOptimizer {
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
        let intensities = context.intensities();
        let targets = context.masked_targets();
        let result = find_min_box_constrained(
            |x: &[f64], g: &mut [f64]| masked_residual(&intensities, &targets, x, g),
            start,
            &self.settings,
        );
        debug!(
            "Original-space optimization: f = {} after {} iterations",
            result.value, result.iterations
        );
        return Ok(OptimizationOutcome::from_result(result));
    }

    fn carries_solution(&self) -> bool {
        return true;
    }

    fn settings(&self) -> &MinimizerSettings {
        return &self.settings;
    }
}

pub fn create_original_space_optimizer(settings: &MinimizerSettings) -> Box<dyn BasisOptimizer> {
    return Box::new(OriginalSpaceOptimizer::new(*settings));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::raster::*;

    #[test]
    fn test_001() {
        let intensities = vec![2.0, 1.0];
        let targets = vec![vec![2.0, 2.0], vec![3.0]];
        let mut g = vec![0.0; 2];
        let f = masked_residual(&intensities, &targets, &[1.0, 3.0], &mut g);
        assert_eq!(f, 0.0);
        assert_eq!(g, vec![0.0, 0.0]);
        let f = masked_residual(&intensities, &targets, &[2.0, 3.0], &mut g);
        // residuals (2, 2) on condition 0
        assert!((f - 8.0_f64.sqrt()).abs() < 1e-12);
        assert!((g[0] - 2.0 * 4.0 / f).abs() < 1e-12);
        assert_eq!(g[1], 0.0);
    }

    #[test]
    fn test_002() {
        // 4x2 map, left half value 2, right half value 6
        let mut map = FloatImage::constant(4, 2, &[2.0; 3]);
        for y in 0..2 {
            for x in 2..4 {
                map.set(x, y, &[6.0; 3]);
            }
        }
        let mut left = ConditionMask::new(4, 2);
        let mut right = ConditionMask::new(4, 2);
        for y in 0..2 {
            left.set(0, y, true);
            left.set(1, y, true);
            right.set(2, y, true);
            right.set(3, y, true);
        }
        // row 0 has zero solid angle weight, so its targets are zero
        let s = solid_angle_weight(1, 2);
        let weights = vec![[s; 3], [s; 3]];
        let context = OptimizationContext::new(&map, vec![Some(&left), Some(&right)], &weights, 0.0);
        let optimizer = OriginalSpaceOptimizer::new(MinimizerSettings::default());
        let a = optimizer.optimize(&context, &[1.0, 1.0]).unwrap();
        let b = optimizer.optimize(&context, &[1.0, 1.0]).unwrap();
        assert_eq!(a, b);
        for x in a.multipliers.iter() {
            assert!(*x >= 0.0 && *x <= 10.0);
        }
        // per condition the optimum is the mean masked target over I_k
        assert!((a.multipliers[0] - 1.0).abs() < 1e-3);
        assert!((a.multipliers[1] - 3.0).abs() < 1e-3);
        assert!(optimizer.carries_solution());
        assert!(optimizer.optimize(&context, &[1.0]).is_err());
    }
}
