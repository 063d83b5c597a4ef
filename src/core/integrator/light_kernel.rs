use crate::core::base::*;

use serde::{Deserialize, Serialize};

/// Spatial profile a light contributes to its cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKernel {
    /// Every pixel of the cell counts fully.
    #[default]
    Point,
    /// Pixels are attenuated by an axis-aligned Gaussian centered on the
    /// cell's light. One `[var_x, var_y]` pair per condition.
    Gaussian { variances: Vec<[f64; 2]> },
}

impl LightKernel {
    /// Attenuation of pixel `(x, y)` in a cell lit from `site` that belongs
    /// to `condition`. Conditions without a variance are unattenuated.
    #[inline]
    pub fn attenuation(&self, x: u32, y: u32, site: &Point2i, condition: usize) -> f64 {
        match self {
            LightKernel::Point => 1.0,
            LightKernel::Gaussian { variances } => match variances.get(condition) {
                Some(v) => gaussian_2d(
                    x as f64,
                    y as f64,
                    site.x as f64,
                    site.y as f64,
                    v[0],
                    v[1],
                ),
                None => 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let site = Point2i::new(10, 10);
        assert_eq!(LightKernel::Point.attenuation(0, 0, &site, 0), 1.0);
        let kernel = LightKernel::Gaussian {
            variances: vec![[80.0, 40.0]],
        };
        assert_eq!(kernel.attenuation(10, 10, &site, 0), 1.0);
        let a = kernel.attenuation(20, 10, &site, 0);
        assert!((a - f64::exp(-100.0 / 160.0)).abs() < 1e-12);
        assert_eq!(kernel.attenuation(20, 10, &site, 3), 1.0);
    }
}
