use crate::core::base::*;
use crate::core::identifier::*;
use crate::core::options::*;
use crate::core::raster::*;
use crate::core::rng::RNG;
use crate::core::sampling::*;

use log::{debug, warn};

/// Draws evenly spaced quantiles from each condition's solid-angle weighted
/// energy distribution and clusters them; every cluster center becomes a
/// light of that condition.
#[derive(Debug, Clone)]
pub struct InverseCdfIdentifier {
    settings: InverseCdfSettings,
}

impl InverseCdfIdentifier {
    pub fn new(settings: &InverseCdfSettings) -> Self {
        InverseCdfIdentifier {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &InverseCdfSettings {
        return &self.settings;
    }

    fn criteria(&self) -> KMeansCriteria {
        return KMeansCriteria {
            attempts: self.settings.attempts,
            max_iterations: self.settings.max_iterations,
            epsilon: self.settings.epsilon,
        };
    }

    /// Light positions of one condition image, in cluster order.
    pub fn locate(&self, image: &FloatImage, clusters: usize, rng: &mut RNG) -> Vec<Point2i> {
        let distribution = EnergyDistribution2D::new(image);
        let samples = distribution.quantile_samples(self.settings.samples, self.settings.tolerance);
        if samples.is_empty() {
            return Vec::new();
        }
        debug!(
            "{} of {} quantiles matched within {}",
            samples.len(),
            self.settings.samples,
            self.settings.tolerance
        );
        // clustered as (row, column)
        let points: Vec<Vector2<f64>> = samples
            .iter()
            .map(|p| Vector2::new(p.y as f64, p.x as f64))
            .collect();
        let result = match kmeans(&points, clusters, &self.criteria(), rng) {
            Some(result) => result,
            None => return Vec::new(),
        };
        let width = image.width() as i32;
        let height = image.height() as i32;
        return result
            .centers
            .iter()
            .map(|c| Point2i::new(c.y as i32, c.x as i32))
            .filter(|p| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height)
            .collect();
    }
}

impl LightSourceIdentifier for InverseCdfIdentifier {
    fn identify(&self, conditions: &LightingConditions) -> Result<LightProposal, LightBasisError> {
        let mut rng = RNG::new_sequence(self.settings.seed);
        let mut groups = Vec::with_capacity(conditions.len());
        for (k, image) in conditions.iter().enumerate() {
            let group = match image {
                Some(image) => {
                    let group = self.locate(image, self.settings.clusters_for(k), &mut rng);
                    if group.is_empty() {
                        warn!("Lighting condition {} carries no energy", k);
                    }
                    group
                }
                None => Vec::new(),
            };
            debug!("Condition {}: {} lights", k, group.len());
            groups.push(group);
        }
        return Ok(LightProposal::Points(groups));
    }
}

pub fn create_inverse_cdf_identifier(settings: &InverseCdfSettings) -> Box<dyn LightSourceIdentifier> {
    return Box::new(InverseCdfIdentifier::new(settings));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_spots() -> FloatImage {
        let mut image = FloatImage::new(200, 100);
        for y in 40..50 {
            for x in 20..30 {
                image.set(x, y, &[1.0, 1.0, 1.0]);
            }
            for x in 150..160 {
                image.set(x, y, &[1.0, 1.0, 1.0]);
            }
        }
        return image;
    }

    #[test]
    fn test_001() {
        let settings = InverseCdfSettings {
            clusters: vec![Some(2)],
            ..InverseCdfSettings::default()
        };
        let identifier = InverseCdfIdentifier::new(&settings);
        let conditions = LightingConditions::from_images(vec![Some(two_spots()), None]);
        let proposal = identifier.identify(&conditions).unwrap();
        let groups = match proposal {
            LightProposal::Points(groups) => groups,
            _ => panic!("expected points"),
        };
        assert_eq!(groups.len(), 2);
        assert!(groups[1].is_empty());
        let mut lights = groups[0].clone();
        lights.sort_by_key(|p| p.x);
        assert_eq!(lights.len(), 2);
        assert!(lights[0].x >= 20 && lights[0].x < 30);
        assert!(lights[1].x >= 150 && lights[1].x < 160);
        for p in lights.iter() {
            assert!(p.y >= 40 && p.y < 50);
        }
    }

    #[test]
    fn test_002() {
        let settings = InverseCdfSettings::default();
        let identifier = InverseCdfIdentifier::new(&settings);
        let conditions = LightingConditions::from_images(vec![Some(two_spots()), Some(FloatImage::new(8, 8))]);
        let a = identifier.identify(&conditions).unwrap();
        let b = identifier.identify(&conditions).unwrap();
        assert_eq!(a, b);
        match a {
            LightProposal::Points(groups) => {
                assert_eq!(groups[0].len(), 1);
                assert!(groups[1].is_empty());
            }
            _ => panic!("expected points"),
        }
    }
}
