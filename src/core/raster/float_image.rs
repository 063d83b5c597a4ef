use crate::core::base::*;

/// Row-major floating point RGB buffer. Used for environment maps, captured
/// lighting conditions and relit results.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    data: Vec<RGB>,
}

impl FloatImage {
    pub fn new(width: u32, height: u32) -> Self {
        FloatImage {
            width,
            height,
            data: vec![[0.0; 3]; (width * height) as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, data: Vec<RGB>) -> Result<Self, LightBasisError> {
        if data.len() != (width as usize) * (height as usize) {
            let msg = format!(
                "Pixel count {} does not match resolution {}x{}",
                data.len(),
                width,
                height
            );
            return Err(LightBasisError::error(&msg));
        }
        return Ok(FloatImage {
            width,
            height,
            data,
        });
    }

    pub fn constant(width: u32, height: u32, value: &RGB) -> Self {
        FloatImage {
            width,
            height,
            data: vec![*value; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        return self.width;
    }

    #[inline]
    pub fn height(&self) -> u32 {
        return self.height;
    }

    #[inline]
    pub fn resolution(&self) -> Point2i {
        return Point2i::new(self.width as i32, self.height as i32);
    }

    #[inline]
    pub fn pixels(&self) -> &[RGB] {
        return &self.data;
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [RGB] {
        return &mut self.data;
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &RGB {
        return &self.data[(y * self.width + x) as usize];
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: &RGB) {
        let index = (y * self.width + x) as usize;
        self.data[index] = *value;
    }

    pub fn same_resolution(&self, other: &FloatImage) -> bool {
        return self.width == other.width && self.height == other.height;
    }

    /// Rotates a latitude-longitude map around the vertical axis by `offset`
    /// radians. Pixel `(x, y)` of the result is the source pixel the
    /// integrator reads for `(x, y)` under the same offset.
    pub fn rotate_lat_long(&self, offset: Float) -> FloatImage {
        let offset_columns = longitude_offset_columns(offset, self.width);
        let mut rotated = FloatImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let sx = shifted_column(x, offset_columns, self.width);
                rotated.set(x, y, self.get(sx, y));
            }
        }
        return rotated;
    }

    pub fn scale(&mut self, s: Float) {
        for p in self.data.iter_mut() {
            for c in 0..3 {
                p[c] *= s;
            }
        }
    }

    /// `self = max(self - other, 0)` per channel.
    pub fn subtract_clamped(&mut self, other: &FloatImage) -> Result<(), LightBasisError> {
        if !self.same_resolution(other) {
            return Err(LightBasisError::error(
                "Cannot subtract images of different resolution",
            ));
        }
        for (p, q) in self.data.iter_mut().zip(other.data.iter()) {
            for c in 0..3 {
                p[c] = Float::max(p[c] - q[c], 0.0);
            }
        }
        return Ok(());
    }

    /// Accumulates `other * w` channel-wise.
    pub fn add_weighted(&mut self, other: &FloatImage, w: &RGBWeight) -> Result<(), LightBasisError> {
        if !self.same_resolution(other) {
            return Err(LightBasisError::error(
                "Cannot combine images of different resolution",
            ));
        }
        for (p, q) in self.data.iter_mut().zip(other.data.iter()) {
            for c in 0..3 {
                p[c] += q[c] * w[c] as Float;
            }
        }
        return Ok(());
    }

    /// Flattens to `[r, g, b, r, g, b, ...]`.
    pub fn to_interleaved(&self) -> Vec<Float> {
        let mut values = Vec::with_capacity(self.data.len() * 3);
        for p in self.data.iter() {
            values.extend_from_slice(p);
        }
        return values;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut img = FloatImage::new(8, 2);
        for x in 0..8 {
            img.set(x, 0, &[x as Float, 0.0, 0.0]);
        }
        // 2.5 columns, floored to 2
        let rotated = img.rotate_lat_long(0.625 * PI);
        assert_eq!(rotated.get(0, 0)[0], 2.0);
        assert_eq!(rotated.get(7, 0)[0], 1.0);
        // -2.5 columns, floored to -3
        let back = img.rotate_lat_long(-0.625 * PI);
        assert_eq!(back.get(0, 0)[0], 5.0);
    }

    #[test]
    fn test_002() {
        let mut a = FloatImage::constant(2, 2, &[1.0, 2.0, 3.0]);
        let b = FloatImage::constant(2, 2, &[2.0, 1.0, 3.0]);
        a.subtract_clamped(&b).unwrap();
        assert_eq!(*a.get(1, 1), [0.0, 1.0, 0.0]);
        assert!(a.subtract_clamped(&FloatImage::new(3, 2)).is_err());
        assert!(FloatImage::from_pixels(2, 2, vec![[0.0; 3]; 3]).is_err());
    }
}
