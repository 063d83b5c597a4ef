use super::original_space::*;
use super::pca_space::*;
use crate::core::optimizer::*;
use crate::core::options::*;

/// Minimizer settings taken from the run options, with the multiplier box.
pub fn minimizer_settings(options: &RelightOptions) -> MinimizerSettings {
    return MinimizerSettings {
        history: options.history,
        tolerance: options.tolerance,
        max_iterations: options.max_iterations,
        ..MinimizerSettings::default()
    };
}

/// Optimizer for the configured method; `None` when optimization is disabled.
pub fn create_optimizer(options: &RelightOptions) -> Option<Box<dyn BasisOptimizer>> {
    let settings = minimizer_settings(options);
    match options.optimization {
        OptimizationMethod::Disabled => None,
        OptimizationMethod::OriginalSpace => Some(create_original_space_optimizer(&settings)),
        OptimizationMethod::PcaSpace { components } => Some(create_pca_space_optimizer(&settings, components)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut options = RelightOptions::default();
        assert!(create_optimizer(&options).is_none());
        options.optimization = OptimizationMethod::OriginalSpace;
        options.history = 4;
        let optimizer = create_optimizer(&options).unwrap();
        assert!(optimizer.carries_solution());
        assert_eq!(optimizer.settings().history, 4);
        assert_eq!(optimizer.settings().upper, 10.0);
        options.optimization = OptimizationMethod::PcaSpace { components: Some(2) };
        assert!(!create_optimizer(&options).unwrap().carries_solution());
    }
}
