use super::light_kernel::*;
use crate::core::base::*;
use crate::core::partition::*;
use crate::core::raster::*;

use log::{debug, warn};

/// Integrates an equirectangular map over regions of its domain, weighting
/// row `i` by `sin(pi * i / H)`. The map is read rotated by an azimuthal
/// offset: destination column `j` takes source column `j + floor(offset * W / 2pi)`
/// modulo `W`.
#[derive(Clone, Debug, Default)]
pub struct SolidAngleIntegrator {
    kernel: LightKernel,
}

fn check_resolution(map: &FloatImage, width: u32, height: u32) -> Result<(), LightBasisError> {
    if map.width() != width || map.height() != height {
        let msg = format!(
            "Environment map is {}x{} but the domain is {}x{}",
            map.width(),
            map.height(),
            width,
            height
        );
        return Err(LightBasisError::error(&msg));
    }
    return Ok(());
}

#[inline]
fn accumulate(acc: &mut RGBWeight, rgb: &RGB, w: f64) {
    let rgb = zero_nan(rgb);
    for c in 0..3 {
        acc[c] += rgb[c] as f64 * w;
    }
}

impl SolidAngleIntegrator {
    pub fn new(kernel: LightKernel) -> Self {
        SolidAngleIntegrator { kernel }
    }

    pub fn kernel(&self) -> &LightKernel {
        return &self.kernel;
    }

    /// Energy per cell of the partition. Pixels NaN in every channel are
    /// skipped; isolated NaN channels count as zero.
    pub fn integrate_cells(
        &self,
        partition: &SpatialPartition,
        map: &FloatImage,
        offset: Float,
    ) -> Result<Vec<RGBWeight>, LightBasisError> {
        let width = partition.width();
        let height = partition.height();
        check_resolution(map, width, height)?;
        let offset_columns = longitude_offset_columns(offset, width);
        let mut weights = vec![[0.0; 3]; partition.number_of_cells()];
        for i in 0..height {
            let sin_theta = solid_angle_weight(i, height);
            for j in 0..width {
                let cell = match partition.cell_at(j, i) {
                    Some(cell) => cell,
                    None => continue,
                };
                let rgb = map.get(shifted_column(j, offset_columns, width), i);
                if is_all_nan(rgb) {
                    continue;
                }
                accumulate(&mut weights[cell], rgb, sin_theta);
            }
        }
        return Ok(weights);
    }

    /// Energy per condition: every pixel is accumulated into the condition
    /// owning its nearest light, attenuated by the light kernel. Cells not
    /// assigned to any condition are ignored.
    pub fn integrate_partition(
        &self,
        partition: &SpatialPartition,
        map: &FloatImage,
        offset: Float,
    ) -> Result<Vec<RGBWeight>, LightBasisError> {
        let width = partition.width();
        let height = partition.height();
        check_resolution(map, width, height)?;
        let mapping = partition.condition_mapping();
        let table = mapping.cell_to_condition(partition.number_of_cells());
        let sites = partition.basis().point_lights();
        let offset_columns = longitude_offset_columns(offset, width);
        let mut weights = vec![[0.0; 3]; mapping.number_of_conditions()];
        let mut unassigned = 0usize;
        for i in 0..height {
            let sin_theta = solid_angle_weight(i, height);
            for j in 0..width {
                let cell = match partition.cell_at(j, i) {
                    Some(cell) => cell,
                    None => continue,
                };
                let condition = match table[cell] {
                    Some(k) => k,
                    None => {
                        unassigned += 1;
                        continue;
                    }
                };
                let rgb = map.get(shifted_column(j, offset_columns, width), i);
                if is_all_nan(rgb) {
                    continue;
                }
                let w = sin_theta * self.kernel.attenuation(j, i, &sites[cell], condition);
                accumulate(&mut weights[condition], rgb, w);
            }
        }
        if unassigned > 0 {
            debug!("{} pixels fall in cells without a condition", unassigned);
        }
        return Ok(weights);
    }

    /// Energy per condition over its mask. Masks are indexed like the
    /// conditions; a missing mask yields zero energy. Masks are read at the
    /// unrotated pixel and the map at the rotated one.
    pub fn integrate_masks(
        &self,
        masks: &[Option<&ConditionMask>],
        map: &FloatImage,
        offset: Float,
    ) -> Vec<RGBWeight> {
        let width = map.width();
        let height = map.height();
        let offset_columns = longitude_offset_columns(offset, width);
        let mut weights = vec![[0.0; 3]; masks.len()];
        for (k, mask) in masks.iter().enumerate() {
            let mask = match mask {
                Some(mask) => *mask,
                None => {
                    warn!("No mask for lighting condition {}", k);
                    continue;
                }
            };
            if mask.width() != width || mask.height() != height {
                warn!(
                    "Mask {} is {}x{}, map is {}x{}",
                    k,
                    mask.width(),
                    mask.height(),
                    width,
                    height
                );
            }
            for i in 0..height {
                let sin_theta = solid_angle_weight(i, height);
                for j in 0..width {
                    if !mask.is_selected(j, i) {
                        continue;
                    }
                    let rgb = map.get(shifted_column(j, offset_columns, width), i);
                    if is_all_nan(rgb) {
                        continue;
                    }
                    accumulate(&mut weights[k], rgb, sin_theta);
                }
            }
        }
        return weights;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near_equal(a: f64, b: f64, e: f64) -> bool {
        return (a - b).abs() < e;
    }

    #[test]
    fn test_001() {
        // constant map over the full sphere integrates to 2 * W / step
        let (w, h) = (64, 32);
        let mut partition = SpatialPartition::new(w, h);
        partition.insert_condition_groups(&[vec![Point2i::new(32, 16)]]);
        let map = FloatImage::constant(w, h, &[1.0, 1.0, 1.0]);
        let integrator = SolidAngleIntegrator::default();
        let weights = integrator.integrate_partition(&partition, &map, 0.0).unwrap();
        let total = weights[0][0] * std::f64::consts::PI / h as f64;
        assert!(near_equal(total / w as f64, 2.0, 1e-2));
    }

    #[test]
    fn test_002() {
        let (w, h) = (16, 8);
        let mut map = FloatImage::constant(w, h, &[1.0, 1.0, 1.0]);
        map.set(3, 4, &[Float::NAN, Float::NAN, Float::NAN]);
        map.set(4, 4, &[Float::NAN, 2.0, 2.0]);
        let mut mask = ConditionMask::new(w, h);
        mask.set(3, 4, true);
        mask.set(4, 4, true);
        let integrator = SolidAngleIntegrator::default();
        let weights = integrator.integrate_masks(&[Some(&mask), None], &map, 0.0);
        let s = solid_angle_weight(4, h);
        assert!(near_equal(weights[0][0], 0.0, 1e-12));
        assert!(near_equal(weights[0][1], 2.0 * s, 1e-12));
        assert_eq!(weights[1], [0.0; 3]);
    }

    #[test]
    fn test_003() {
        let partition = SpatialPartition::new(8, 4);
        let map = FloatImage::new(4, 4);
        let integrator = SolidAngleIntegrator::default();
        assert!(integrator.integrate_partition(&partition, &map, 0.0).is_err());
    }
}
