use crate::core::base::*;
use crate::core::rng::RNG;

use log::debug;

/// Termination settings for [`kmeans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansCriteria {
    pub attempts: usize,
    pub max_iterations: usize,
    /// Lloyd iterations stop once no center moves farther than this.
    pub epsilon: f64,
}

impl Default for KMeansCriteria {
    fn default() -> Self {
        KMeansCriteria {
            attempts: 5,
            max_iterations: 10000,
            epsilon: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub centers: Vec<Vector2<f64>>,
    pub labels: Vec<usize>,
    /// Sum of squared distances of every sample to its center.
    pub compactness: f64,
}

fn nearest_center(p: &Vector2<f64>, centers: &[Vector2<f64>]) -> (usize, f64) {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = Vector2::<f64>::distance_squared(p, c);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    return (best, best_d);
}

/// k-means++ seeding: first center uniform, then each next sample picked
/// with probability proportional to its squared distance to the chosen set.
fn seed_centers(samples: &[Vector2<f64>], k: usize, rng: &mut RNG) -> Vec<Vector2<f64>> {
    let mut centers = Vec::with_capacity(k);
    centers.push(samples[rng.uniform_index(samples.len())]);
    let mut dist: Vec<f64> = samples
        .iter()
        .map(|p| Vector2::<f64>::distance_squared(p, &centers[0]))
        .collect();
    while centers.len() < k {
        let sum: f64 = dist.iter().sum();
        let next = if sum > 0.0 {
            let target = rng.uniform_f64() * sum;
            let mut acc = 0.0;
            let mut chosen = samples.len() - 1;
            for (i, d) in dist.iter().enumerate() {
                acc += d;
                if acc > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // every sample coincides with a center already
            rng.uniform_index(samples.len())
        };
        let c = samples[next];
        centers.push(c);
        for (i, p) in samples.iter().enumerate() {
            dist[i] = f64::min(dist[i], Vector2::<f64>::distance_squared(p, &c));
        }
    }
    return centers;
}

fn lloyd(
    samples: &[Vector2<f64>],
    mut centers: Vec<Vector2<f64>>,
    criteria: &KMeansCriteria,
) -> KMeansResult {
    let k = centers.len();
    let mut labels = vec![0; samples.len()];
    let mut distances = vec![0.0; samples.len()];
    let eps2 = criteria.epsilon * criteria.epsilon;
    for iteration in 0..criteria.max_iterations.max(1) {
        for (i, p) in samples.iter().enumerate() {
            let (label, d) = nearest_center(p, &centers);
            labels[i] = label;
            distances[i] = d;
        }
        let mut sums = vec![Vector2::<f64>::new(0.0, 0.0); k];
        let mut counts = vec![0usize; k];
        for (i, p) in samples.iter().enumerate() {
            sums[labels[i]] = sums[labels[i]] + *p;
            counts[labels[i]] += 1;
        }
        // empty clusters take over the samples farthest from their centers
        let mut farthest: Vec<usize> = Vec::new();
        if counts.iter().any(|n| *n == 0) {
            farthest = (0..samples.len()).collect();
            farthest.sort_by(|a, b| distances[*b].total_cmp(&distances[*a]).then(a.cmp(b)));
        }
        let mut next_far = 0;
        let mut max_shift: f64 = 0.0;
        for c in 0..k {
            let updated = if counts[c] > 0 {
                sums[c] * (1.0 / counts[c] as f64)
            } else {
                let far = farthest[next_far % farthest.len()];
                next_far += 1;
                samples[far]
            };
            max_shift = f64::max(max_shift, Vector2::<f64>::distance_squared(&updated, &centers[c]));
            centers[c] = updated;
        }
        if max_shift <= eps2 {
            debug!("k-means converged after {} iterations", iteration + 1);
            break;
        }
    }
    let mut compactness = 0.0;
    for (i, p) in samples.iter().enumerate() {
        let (label, d) = nearest_center(p, &centers);
        labels[i] = label;
        compactness += d;
    }
    return KMeansResult {
        centers,
        labels,
        compactness,
    };
}

/// Clusters `samples` into `k` groups, keeping the most compact of
/// `criteria.attempts` runs. `k` is clamped to the number of samples;
/// returns `None` when there is nothing to cluster.
pub fn kmeans(
    samples: &[Vector2<f64>],
    k: usize,
    criteria: &KMeansCriteria,
    rng: &mut RNG,
) -> Option<KMeansResult> {
    let k = k.min(samples.len());
    if k == 0 {
        return None;
    }
    let mut best: Option<KMeansResult> = None;
    for _ in 0..criteria.attempts.max(1) {
        let centers = seed_centers(samples, k, rng);
        let result = lloyd(samples, centers, criteria);
        let better = match &best {
            Some(b) => result.compactness < b.compactness,
            None => true,
        };
        if better {
            best = Some(result);
        }
    }
    return best;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut samples = Vec::new();
        for i in 0..20 {
            samples.push(Vector2::new(10.0 + (i % 3) as f64, 20.0 + (i % 2) as f64));
            samples.push(Vector2::new(300.0 + (i % 3) as f64, 100.0 + (i % 2) as f64));
        }
        let mut rng = RNG::new_sequence(1);
        let result = kmeans(&samples, 2, &KMeansCriteria::default(), &mut rng).unwrap();
        let mut centers = result.centers.clone();
        centers.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert!((centers[0].x - 11.0).abs() < 0.1);
        assert!((centers[0].y - 20.5).abs() < 0.1);
        assert!((centers[1].x - 301.0).abs() < 0.1);
        assert_ne!(result.labels[0], result.labels[1]);
    }

    #[test]
    fn test_002() {
        let samples = vec![Vector2::new(1.0, 2.0)];
        let mut rng = RNG::new();
        let result = kmeans(&samples, 3, &KMeansCriteria::default(), &mut rng).unwrap();
        assert_eq!(result.centers.len(), 1);
        assert!(kmeans(&[], 2, &KMeansCriteria::default(), &mut rng).is_none());
    }

    #[test]
    fn test_003() {
        let samples: Vec<Vector2<f64>> = (0..30)
            .map(|i| Vector2::new((i * 7 % 13) as f64, (i * 5 % 11) as f64))
            .collect();
        let criteria = KMeansCriteria::default();
        let a = kmeans(&samples, 3, &criteria, &mut RNG::new_sequence(9)).unwrap();
        let b = kmeans(&samples, 3, &criteria, &mut RNG::new_sequence(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_004() {
        // two centers start far from every sample and must pick distinct ones
        let samples = vec![Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0), Vector2::new(10.0, 0.0)];
        let centers = vec![
            Vector2::new(0.0, 0.5),
            Vector2::new(100.0, 100.0),
            Vector2::new(200.0, 200.0),
        ];
        let result = lloyd(&samples, centers, &KMeansCriteria::default());
        assert!(result.compactness < 1e-12);
        let mut labels = result.labels.clone();
        labels.sort();
        assert_eq!(labels, vec![0, 1, 2]);
    }
}
