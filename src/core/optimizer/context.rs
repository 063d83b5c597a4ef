use crate::core::base::*;
use crate::core::raster::*;

/// Inputs shared by every objective evaluation of one offset. Built once by
/// the caller and borrowed by the objective.
#[derive(Debug, Clone)]
pub struct OptimizationContext<'a> {
    pub map: &'a FloatImage,
    /// Comparison region per condition. The indirect-light condition is
    /// expected to carry the residual mask.
    pub masks: Vec<Option<&'a ConditionMask>>,
    pub weights: &'a [RGBWeight],
    pub offset: Float,
}

impl<'a> OptimizationContext<'a> {
    pub fn new(
        map: &'a FloatImage,
        masks: Vec<Option<&'a ConditionMask>>,
        weights: &'a [RGBWeight],
        offset: Float,
    ) -> Self {
        OptimizationContext {
            map,
            masks,
            weights,
            offset,
        }
    }

    #[inline]
    pub fn number_of_conditions(&self) -> usize {
        return self.weights.len();
    }

    /// Mean of the RGB weight of every condition.
    pub fn intensities(&self) -> Vec<f64> {
        return self.weights.iter().map(weight_intensity).collect();
    }

    #[inline]
    pub fn mask(&self, condition: usize) -> Option<&'a ConditionMask> {
        return self.masks.get(condition).copied().flatten();
    }

    /// Solid-angle weighted channel mean of the rotated map, row-major.
    /// `None` marks pixels that are NaN in every channel.
    pub fn target_intensity(&self) -> Vec<Option<f64>> {
        let width = self.map.width();
        let height = self.map.height();
        let offset_columns = longitude_offset_columns(self.offset, width);
        let mut target = Vec::with_capacity((width as usize) * (height as usize));
        for i in 0..height {
            let sin_theta = solid_angle_weight(i, height);
            for j in 0..width {
                let rgb = self.map.get(shifted_column(j, offset_columns, width), i);
                if is_all_nan(rgb) {
                    target.push(None);
                } else {
                    target.push(Some(luminance_mean(&zero_nan(rgb)) as f64 * sin_theta));
                }
            }
        }
        return target;
    }

    /// Target values inside each condition's mask, skipping NaN pixels. A
    /// missing mask selects nothing.
    pub fn masked_targets(&self) -> Vec<Vec<f64>> {
        let target = self.target_intensity();
        let width = self.map.width();
        let height = self.map.height();
        let mut result = Vec::with_capacity(self.number_of_conditions());
        for k in 0..self.number_of_conditions() {
            let mut values = Vec::new();
            if let Some(mask) = self.mask(k) {
                for i in 0..height {
                    for j in 0..width {
                        if !mask.is_selected(j, i) {
                            continue;
                        }
                        if let Some(e) = target[(i * width + j) as usize] {
                            values.push(e);
                        }
                    }
                }
            }
            result.push(values);
        }
        return result;
    }
}
