use crate::core::base::*;
use crate::core::identifier::*;
use crate::core::raster::*;

use log::{debug, warn};

/// One light per condition, at the pixel where the cumulative energy of the
/// condition image first exceeds half of its total.
#[derive(Debug, Clone, Default)]
pub struct MedianEnergyIdentifier {}

impl MedianEnergyIdentifier {
    pub fn new() -> Self {
        MedianEnergyIdentifier {}
    }
}

/// First row-major pixel whose running channel-mean sum exceeds half of the
/// image total. NaN channels count as zero; `None` for an image without
/// energy.
pub fn median_energy_pixel(image: &FloatImage) -> Option<Point2i> {
    let energies: Vec<f64> = image
        .pixels()
        .iter()
        .map(|rgb| luminance_mean(&zero_nan(rgb)) as f64)
        .collect();
    let total: f64 = energies.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    let half = 0.5 * total;
    let mut running = 0.0;
    for (index, e) in energies.iter().enumerate() {
        running += e;
        if running > half {
            let width = image.width() as usize;
            return Some(Point2i::new((index % width) as i32, (index / width) as i32));
        }
    }
    return None;
}

impl LightSourceIdentifier for MedianEnergyIdentifier {
    fn identify(&self, conditions: &LightingConditions) -> Result<LightProposal, LightBasisError> {
        let mut groups = Vec::with_capacity(conditions.len());
        for (k, image) in conditions.iter().enumerate() {
            let position = match image {
                Some(image) => median_energy_pixel(image),
                None => None,
            };
            match position {
                Some(p) => {
                    debug!("Condition {}: median energy at ({}, {})", k, p.x, p.y);
                    groups.push(vec![p]);
                }
                None => {
                    if image.is_some() {
                        warn!("Lighting condition {} carries no energy", k);
                    }
                    groups.push(Vec::new());
                }
            }
        }
        return Ok(LightProposal::Points(groups));
    }
}

pub fn create_median_energy_identifier() -> Box<dyn LightSourceIdentifier> {
    return Box::new(MedianEnergyIdentifier::new());
}
