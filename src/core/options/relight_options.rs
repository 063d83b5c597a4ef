use crate::core::base::*;
use crate::core::integrator::LightKernel;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn normalize_key(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '.'))
        .collect()
}

/// Parameters of the inverse-CDF light search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverseCdfSettings {
    /// Number of quantiles drawn from each condition's energy distribution.
    pub samples: usize,
    /// Largest accepted gap between a quantile and the CDF value found.
    pub tolerance: f64,
    pub default_clusters: usize,
    /// Cluster count per condition index; `null` or a missing entry falls
    /// back to `default_clusters`.
    pub clusters: Vec<Option<usize>>,
    pub attempts: usize,
    pub max_iterations: usize,
    pub epsilon: f64,
    pub seed: u64,
}

impl Default for InverseCdfSettings {
    fn default() -> Self {
        InverseCdfSettings {
            samples: 1000,
            tolerance: 0.01,
            default_clusters: 1,
            clusters: Vec::new(),
            attempts: 5,
            max_iterations: 10000,
            epsilon: 1e-4,
            seed: 0,
        }
    }
}

impl InverseCdfSettings {
    pub fn clusters_for(&self, condition: usize) -> usize {
        return self
            .clusters
            .get(condition)
            .copied()
            .flatten()
            .unwrap_or(self.default_clusters);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IdentificationMethod {
    /// One light per condition at its median-energy pixel.
    #[default]
    MedianEnergy,
    InverseCdf(InverseCdfSettings),
    /// No lights; conditions are integrated over their masks.
    Masks,
    /// Lights and their grouping are read from files.
    BasisFile { basis: PathBuf, grouping: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OptimizationMethod {
    #[default]
    Disabled,
    OriginalSpace,
    /// `components` defaults to the number of conditions.
    PcaSpace { components: Option<usize> },
}

impl FromStr for OptimizationMethod {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(value);
        Ok(match key.as_str() {
            "disabled" | "none" | "off" => Self::Disabled,
            "originalspace" | "original" => Self::OriginalSpace,
            "pcaspace" | "pca" => Self::PcaSpace { components: None },
            _ => return Err("unknown optimization method"),
        })
    }
}

/// Everything a relighting run needs. Condition-indexed lists share one
/// index space; a `null` entry marks a missing input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelightOptions {
    pub environment_map: Option<PathBuf>,
    /// Per-condition light images, as seen from the capture position.
    pub lighting_conditions: Vec<Option<PathBuf>>,
    pub condition_masks: Vec<Option<PathBuf>>,
    pub residual_mask: Option<PathBuf>,
    pub reflectance_field: Vec<Option<PathBuf>>,
    pub object_mask: Option<PathBuf>,
    /// Condition capturing the room without any direct light.
    pub indirect_light_condition: Option<usize>,
    pub identification: IdentificationMethod,
    pub light_kernel: LightKernel,
    pub optimization: OptimizationMethod,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub history: usize,
    pub number_of_offsets: usize,
    pub exposure: Float,
    pub remove_indirect_light: bool,
    /// Angle in degrees spanned by each axis of the camera that fills the
    /// background of relit images.
    pub field_of_view: Float,
    pub output_dir: PathBuf,
}

impl Default for RelightOptions {
    fn default() -> Self {
        RelightOptions {
            environment_map: None,
            lighting_conditions: Vec::new(),
            condition_masks: Vec::new(),
            residual_mask: None,
            reflectance_field: Vec::new(),
            object_mask: None,
            indirect_light_condition: None,
            identification: IdentificationMethod::default(),
            light_kernel: LightKernel::default(),
            optimization: OptimizationMethod::default(),
            max_iterations: 1000,
            tolerance: 1e-9,
            history: 10,
            number_of_offsets: 1,
            exposure: 0.0,
            remove_indirect_light: false,
            field_of_view: 90.0,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl RelightOptions {
    pub fn new() -> Self {
        RelightOptions::default()
    }

    pub fn from_json(text: &str) -> Result<Self, LightBasisError> {
        let options: RelightOptions = serde_json::from_str(text)?;
        return Ok(options);
    }

    pub fn load(path: &Path) -> Result<Self, LightBasisError> {
        let text = std::fs::read_to_string(path)?;
        return Self::from_json(&text);
    }

    pub fn to_json(&self) -> Result<String, LightBasisError> {
        return Ok(serde_json::to_string_pretty(self)?);
    }

    /// Largest index space used by any condition-indexed input.
    pub fn number_of_conditions(&self) -> usize {
        let mut n = self
            .lighting_conditions
            .len()
            .max(self.condition_masks.len())
            .max(self.reflectance_field.len());
        if let Some(k) = self.indirect_light_condition {
            n = n.max(k + 1);
        }
        return n;
    }
}
