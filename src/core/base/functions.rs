use super::types::*;

/// Solid angle correction of an equirectangular row: `sin(pi * row / height)`.
#[inline]
pub fn solid_angle_weight(row: u32, height: u32) -> f64 {
    return f64::sin(std::f64::consts::PI * row as f64 / height as f64);
}

/// Remainder of `number / modulo` in `[0, modulo)`.
#[inline]
pub fn modulo_real(number: f64, modulo: f64) -> f64 {
    let quotient = f64::floor(number / modulo);
    return number - quotient * modulo;
}

/// Number of columns an azimuthal rotation of `offset` radians shifts a map of
/// `width` columns by.
#[inline]
pub fn longitude_offset_columns(offset: Float, width: u32) -> i64 {
    let turns = offset as f64 * 0.5 * std::f64::consts::FRAC_1_PI;
    return f64::floor(turns * width as f64) as i64;
}

/// Column of the source map read for destination column `j` under a shift of
/// `offset_columns`. Negative shifts wrap around.
#[inline]
pub fn shifted_column(j: u32, offset_columns: i64, width: u32) -> u32 {
    return (j as i64 + offset_columns).rem_euclid(width as i64) as u32;
}

#[inline]
pub fn luminance_mean(rgb: &RGB) -> Float {
    return (rgb[0] + rgb[1] + rgb[2]) / 3.0;
}

#[inline]
pub fn is_all_nan(rgb: &RGB) -> bool {
    return rgb[0].is_nan() && rgb[1].is_nan() && rgb[2].is_nan();
}

/// Replaces individual NaN channels by zero.
#[inline]
pub fn zero_nan(rgb: &RGB) -> RGB {
    let f = |v: Float| if v.is_nan() { 0.0 } else { v };
    return [f(rgb[0]), f(rgb[1]), f(rgb[2])];
}

pub fn gaussian_2d(x: f64, y: f64, mean_x: f64, mean_y: f64, var_x: f64, var_y: f64) -> f64 {
    let dx = x - mean_x;
    let dy = y - mean_y;
    return f64::exp(-dx * dx / (2.0 * var_x) - dy * dy / (2.0 * var_y));
}

#[inline]
pub fn weight_intensity(w: &RGBWeight) -> f64 {
    return (w[0] + w[1] + w[2]) / 3.0;
}

/// Divides every weight by the largest per-channel sum so the dominant channel
/// aggregates to one. All channels share the divisor to keep hues intact.
pub fn normalize_weights_rgb(weights: &mut [RGBWeight]) {
    let mut sums = [0.0; 3];
    for w in weights.iter() {
        for c in 0..3 {
            sums[c] += w[c];
        }
    }
    let sum = f64::max(sums[0], f64::max(sums[1], sums[2]));
    if sum != 0.0 {
        for w in weights.iter_mut() {
            for c in 0..3 {
                w[c] /= sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        assert_eq!(solid_angle_weight(0, 512), 0.0);
        assert!((solid_angle_weight(256, 512) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_002() {
        assert_eq!(shifted_column(1020, 10, 1024), 6);
        assert_eq!(shifted_column(3, -10, 1024), 1017);
        assert_eq!(longitude_offset_columns(1.0, 1024), 162);
        assert_eq!(longitude_offset_columns(-1.0, 1024), -163);
        assert_eq!(longitude_offset_columns(0.0, 1024), 0);
    }

    #[test]
    fn test_003() {
        let mut w = vec![[1.0, 2.0, 0.5], [3.0, 2.0, 0.5]];
        normalize_weights_rgb(&mut w);
        assert_eq!(w[0], [0.25, 0.5, 0.125]);
        assert_eq!(w[1], [0.75, 0.5, 0.125]);

        let mut zero = vec![[0.0; 3]; 2];
        normalize_weights_rgb(&mut zero);
        assert_eq!(zero[0], [0.0; 3]);
    }

    #[test]
    fn test_004() {
        let nan = Float::NAN;
        assert!(is_all_nan(&[nan, nan, nan]));
        assert!(!is_all_nan(&[nan, 1.0, nan]));
        assert_eq!(zero_nan(&[nan, 1.0, 2.0]), [0.0, 1.0, 2.0]);
        assert!((modulo_real(-1.0, 4.0) - 3.0).abs() < 1e-6);
    }
}
