use crate::core::base::*;
use crate::core::raster::*;

/// Row-major discrete distribution of the solid-angle weighted energy of a
/// latitude-longitude image.
#[derive(Debug, Default, Clone)]
pub struct EnergyDistribution2D {
    pub width: u32,
    pub height: u32,
    pub pdf: Vec<f64>,
    pub cdf: Vec<f64>,
    pub func_int: f64,
    // pixels with positive density and their CDF values, for inversion
    support: Vec<usize>,
    support_cdf: Vec<f64>,
}

/// Index of the CDF entry closest to `u`. `cdf` must be non-decreasing.
#[inline(always)]
fn find_nearest_cdf(cdf: &[f64], u: f64) -> usize {
    let mut first = 0usize;
    let mut len = cdf.len();
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;
        if cdf[middle] < u {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    // first is the lower bound; its predecessor may be closer
    if first >= cdf.len() {
        return cdf.len() - 1;
    }
    if first > 0 && (u - cdf[first - 1]) <= (cdf[first] - u) {
        return first - 1;
    }
    return first;
}

impl EnergyDistribution2D {
    /// Pixel density is the channel mean times `sin(pi * row / H)`. NaN
    /// channels and negative intensities contribute nothing.
    pub fn new(image: &FloatImage) -> Self {
        let width = image.width();
        let height = image.height();
        let n = (width as usize) * (height as usize);
        let mut pdf = vec![0.0; n];
        let mut func_int = 0.0;
        for i in 0..height {
            let sin_theta = solid_angle_weight(i, height);
            for j in 0..width {
                let rgb = image.get(j, i);
                if is_all_nan(rgb) {
                    continue;
                }
                let v = f64::max(luminance_mean(&zero_nan(rgb)) as f64, 0.0) * sin_theta;
                pdf[(i * width + j) as usize] = v;
                func_int += v;
            }
        }
        let mut cdf = vec![0.0; n];
        let mut support = Vec::new();
        let mut support_cdf = Vec::new();
        if func_int > 0.0 {
            let mut acc = 0.0;
            for k in 0..n {
                pdf[k] /= func_int;
                acc += pdf[k];
                cdf[k] = acc;
                if pdf[k] > 0.0 {
                    support.push(k);
                    support_cdf.push(acc);
                }
            }
        }
        EnergyDistribution2D {
            width,
            height,
            pdf,
            cdf,
            func_int,
            support,
            support_cdf,
        }
    }

    pub fn count(&self) -> usize {
        return self.pdf.len();
    }

    pub fn is_empty(&self) -> bool {
        return !(self.func_int > 0.0);
    }

    /// Pixel of positive density whose CDF value is nearest to `u`, provided
    /// it lies within `tolerance` of it.
    pub fn invert(&self, u: f64, tolerance: f64) -> Option<Point2i> {
        if self.support.is_empty() {
            return None;
        }
        let nearest = find_nearest_cdf(&self.support_cdf, u);
        if (self.support_cdf[nearest] - u).abs() >= tolerance {
            return None;
        }
        let index = self.support[nearest];
        let x = (index % self.width as usize) as i32;
        let y = (index / self.width as usize) as i32;
        return Some(Point2i::new(x, y));
    }

    /// Inverts the `count` quantiles `k / count`, dropping those without a
    /// CDF value within `tolerance`.
    pub fn quantile_samples(&self, count: usize, tolerance: f64) -> Vec<Point2i> {
        if self.is_empty() {
            return Vec::new();
        }
        return (0..count)
            .filter_map(|k| self.invert(k as f64 / count as f64, tolerance))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let cdf = [0.1, 0.2, 0.2, 0.6, 1.0];
        assert_eq!(find_nearest_cdf(&cdf, 0.0), 0);
        assert_eq!(find_nearest_cdf(&cdf, 0.14), 0);
        assert_eq!(find_nearest_cdf(&cdf, 0.19), 1);
        assert_eq!(find_nearest_cdf(&cdf, 0.5), 3);
        assert_eq!(find_nearest_cdf(&cdf, 2.0), 4);
    }

    #[test]
    fn test_002() {
        let mut image = FloatImage::new(400, 4);
        for x in 100..300 {
            image.set(x, 2, &[3.0, 3.0, 3.0]);
        }
        let distribution = EnergyDistribution2D::new(&image);
        assert!((distribution.cdf[distribution.count() - 1] - 1.0).abs() < 1e-12);
        let samples = distribution.quantile_samples(10, 0.01);
        assert_eq!(samples.len(), 10);
        for s in samples.iter() {
            assert_eq!(s.y, 2);
            assert!(s.x >= 100 && s.x < 300);
        }
        // CDF steps of 0.005: quantile 0.5 lands on the 100th lit pixel
        assert_eq!(samples[5], Point2i::new(199, 2));

        // a single lit pixel only answers quantiles near one
        let mut single = FloatImage::new(8, 4);
        single.set(5, 2, &[1.0, 1.0, 1.0]);
        let distribution = EnergyDistribution2D::new(&single);
        assert_eq!(distribution.invert(0.995, 0.01), Some(Point2i::new(5, 2)));
        assert_eq!(distribution.invert(0.5, 0.01), None);
    }

    #[test]
    fn test_003() {
        let image = FloatImage::constant(8, 4, &[Float::NAN; 3]);
        let distribution = EnergyDistribution2D::new(&image);
        assert!(distribution.is_empty());
        assert!(distribution.quantile_samples(10, 0.01).is_empty());
    }
}
