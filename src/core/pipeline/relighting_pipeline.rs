use super::weights_file::*;
use crate::core::base::*;
use crate::core::basis::*;
use crate::core::identifier::*;
use crate::core::imageio::*;
use crate::core::integrator::*;
use crate::core::optimizer::*;
use crate::core::options::*;
use crate::core::partition::*;
use crate::core::raster::*;
use crate::core::reflectance::*;
use crate::identifiers::create_identifier;
use crate::optimizers::create_optimizer;

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Weights computed for one azimuthal offset of the environment map.
#[derive(Debug, Clone)]
pub struct OffsetResult {
    pub offset: Float,
    /// Normalized per-condition weights.
    pub weights: Vec<RGBWeight>,
    pub outcome: Option<OptimizationOutcome>,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub partition: SpatialPartition,
    pub results: Vec<OffsetResult>,
}

/// Batch run: identify the lights, then weight every condition for each
/// rotation of the environment map and write the results.
#[derive(Debug, Clone)]
pub struct RelightingPipeline {
    options: RelightOptions,
}

fn path_str(path: &Path) -> String {
    return path.to_string_lossy().to_string();
}

fn load_optional_mask(path: Option<&PathBuf>, what: &str) -> Option<ConditionMask> {
    let path = path?;
    match read_mask(&path_str(path)) {
        Ok(mask) => Some(mask),
        Err(e) => {
            warn!("Skipping {}: {}", what, e);
            None
        }
    }
}

impl RelightingPipeline {
    pub fn new(options: RelightOptions) -> Self {
        RelightingPipeline { options }
    }

    pub fn options(&self) -> &RelightOptions {
        return &self.options;
    }

    fn output_path(&self, name: &str) -> String {
        return path_str(&self.options.output_dir.join(name));
    }

    fn load_environment_map(&self) -> Result<FloatImage, LightBasisError> {
        let path = match self.options.environment_map.as_ref() {
            Some(path) => path,
            None => return Err(LightBasisError::error("No environment map configured")),
        };
        let map = match read_image(&path_str(path)) {
            Ok(map) => map,
            Err(e) => {
                let msg = format!("Cannot load environment map {}: {}", path.display(), e);
                return Err(LightBasisError::error(&msg));
            }
        };
        info!(
            "Environment map {} is {}x{}",
            path.display(),
            map.width(),
            map.height()
        );
        return Ok(map);
    }

    /// Condition masks in condition order, missing entries empty.
    fn load_condition_masks(&self, number_of_conditions: usize) -> Vec<Option<ConditionMask>> {
        let mut masks = Vec::with_capacity(number_of_conditions);
        for k in 0..number_of_conditions {
            let path = self.options.condition_masks.get(k).and_then(|p| p.as_ref());
            masks.push(load_optional_mask(path, &format!("mask of condition {}", k)));
        }
        return masks;
    }

    /// Masks compared against the map. The indirect-light condition sees only
    /// the pixels of the residual mask that no other condition claims.
    pub fn comparison_masks(
        masks: &[Option<ConditionMask>],
        residual: Option<&ConditionMask>,
        indirect: Option<usize>,
    ) -> Vec<Option<ConditionMask>> {
        let mut result = masks.to_vec();
        let (residual, indirect) = match (residual, indirect) {
            (Some(r), Some(k)) => (r, k),
            _ => return result,
        };
        let others: Vec<&ConditionMask> = masks
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != indirect)
            .filter_map(|(_, m)| m.as_ref())
            .collect();
        if indirect >= result.len() {
            result.resize(indirect + 1, None);
        }
        result[indirect] = Some(ConditionMask::residual(residual, &others));
        return result;
    }

    fn identify(&self, conditions: &LightingConditions, partition: &mut SpatialPartition) -> bool {
        let identifier = create_identifier(&self.options.identification);
        let proposal = match identifier.identify(conditions) {
            Ok(proposal) => proposal,
            Err(e) => {
                warn!("Light identification failed, no lights placed: {}", e);
                LightProposal::Points(vec![Vec::new(); conditions.len()])
            }
        };
        let mapping = proposal.apply(partition, conditions.len());
        info!(
            "Identified {} lights for {} conditions",
            partition.number_of_cells(),
            mapping.number_of_conditions()
        );
        return proposal.uses_masks();
    }

    fn write_offset(
        &self,
        index: usize,
        result: &OffsetResult,
        partition: &SpatialPartition,
        map: &FloatImage,
        field: &ReflectanceField,
    ) -> Result<(), LightBasisError> {
        save_weights(&self.output_path(&format!("weights_{}.txt", index)), &result.weights)?;
        if partition.number_of_cells() > 0 {
            let bytes = render_partition(partition, &result.weights);
            write_image_bytes(
                &self.output_path(&format!("partition_{}.png", index)),
                bytes,
                partition.width(),
                partition.height(),
            )?;
        }
        if let Some(mut relit) = field.relight(&result.weights) {
            change_exposure(&mut relit, self.options.exposure);
            field.composite_background(&mut relit, map, result.offset, self.options.field_of_view);
            write_image_pfm(&self.output_path(&format!("relit_{}.pfm", index)), &relit)?;
        }
        return Ok(());
    }

    /// Runs every stage. Only an unavailable environment map or an output
    /// that cannot be written fails the run.
    pub fn run(&self) -> Result<PipelineReport, LightBasisError> {
        let map = self.load_environment_map()?;
        std::fs::create_dir_all(&self.options.output_dir)?;
        let number_of_conditions = self.options.number_of_conditions();

        let mut conditions = LightingConditions::load(&self.options.lighting_conditions, number_of_conditions);
        if self.options.remove_indirect_light {
            match self.options.indirect_light_condition {
                Some(k) => conditions.remove_indirect_light(k),
                None => warn!("Indirect light removal requested without an indirect light condition"),
            }
        }

        let masks = self.load_condition_masks(number_of_conditions);
        let residual = load_optional_mask(self.options.residual_mask.as_ref(), "residual mask");
        let masks = Self::comparison_masks(&masks, residual.as_ref(), self.options.indirect_light_condition);

        let mut partition = SpatialPartition::new(map.width(), map.height());
        let uses_masks = self.identify(&conditions, &mut partition);

        let field = ReflectanceField::load(&self.options.reflectance_field, self.options.object_mask.as_ref());
        let integrator = SolidAngleIntegrator::new(self.options.light_kernel.clone());
        let optimizer = create_optimizer(&self.options);

        let count = self.options.number_of_offsets.max(1);
        let mut results = Vec::with_capacity(count);
        let mut start: Option<Vec<f64>> = None;
        for l in 0..count {
            let offset = TWO_PI * l as Float / count as Float;
            info!("Offset {} of {}: {} rad", l + 1, count, offset);

            let mut weights = if uses_masks {
                let refs: Vec<Option<&ConditionMask>> = masks.iter().map(|m| m.as_ref()).collect();
                integrator.integrate_masks(&refs, &map, offset)
            } else {
                integrator.integrate_partition(&partition, &map, offset)?
            };

            let mut outcome = None;
            if let Some(optimizer) = optimizer.as_ref() {
                let n = weights.len();
                let mut refs: Vec<Option<&ConditionMask>> = masks.iter().map(|m| m.as_ref()).collect();
                refs.resize(n, None);
                let context = OptimizationContext::new(&map, refs, &weights, offset);
                let x0 = match start.as_ref() {
                    Some(x) if x.len() == n => x.clone(),
                    _ => initial_multipliers(n),
                };
                let result = optimizer.optimize(&context, &x0)?;
                debug!("Multipliers: {:?}", result.multipliers);
                weights = result.apply(&weights);
                if optimizer.carries_solution() {
                    start = Some(result.multipliers.clone());
                }
                outcome = Some(result);
            }

            normalize_weights_rgb(&mut weights);
            let result = OffsetResult {
                offset,
                weights,
                outcome,
            };
            self.write_offset(l, &result, &partition, &map, &field)?;
            results.push(result);
        }

        if partition.number_of_cells() > 0 {
            save_basis(&self.output_path("basis.txt"), partition.basis())?;
            save_grouping(&self.output_path("grouping.txt"), partition.condition_mapping().groups())?;
        }
        info!("Wrote {} offsets to {}", count, self.options.output_dir.display());
        return Ok(PipelineReport { partition, results });
    }
}
