use super::context::*;
use super::lbfgsb::*;
use crate::core::base::*;

/// Multipliers found for one offset.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub multipliers: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl OptimizationOutcome {
    pub fn from_result(result: MinimizeResult) -> Self {
        OptimizationOutcome {
            multipliers: result.x,
            value: result.value,
            iterations: result.iterations,
            converged: result.converged,
        }
    }

    /// Initial weights scaled by the multipliers, channel by channel.
    /// Conditions without a multiplier keep their weight.
    pub fn apply(&self, weights: &[RGBWeight]) -> Vec<RGBWeight> {
        return weights
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let x = self.multipliers.get(k).copied().unwrap_or(1.0);
                [w[0] * x, w[1] * x, w[2] * x]
            })
            .collect();
    }
}

/// Refines per-condition weights against the target map.
pub trait BasisOptimizer {
    fn optimize(
        &self,
        context: &OptimizationContext,
        start: &[f64],
    ) -> Result<OptimizationOutcome, LightBasisError>;

    /// Whether the solution of one offset is the starting point of the next.
    fn carries_solution(&self) -> bool;

    fn settings(&self) -> &MinimizerSettings;
}

/// Multipliers at which every optimization starts.
pub fn initial_multipliers(number_of_conditions: usize) -> Vec<f64> {
    return vec![1.0; number_of_conditions];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let outcome = OptimizationOutcome {
            multipliers: vec![2.0, 0.5],
            value: 0.0,
            iterations: 1,
            converged: true,
        };
        let weights = vec![[1.0, 2.0, 3.0], [4.0, 4.0, 4.0], [1.0, 1.0, 1.0]];
        let scaled = outcome.apply(&weights);
        assert_eq!(scaled[0], [2.0, 4.0, 6.0]);
        assert_eq!(scaled[1], [2.0, 2.0, 2.0]);
        assert_eq!(scaled[2], [1.0, 1.0, 1.0]);
        assert_eq!(initial_multipliers(3), vec![1.0; 3]);
    }
}
