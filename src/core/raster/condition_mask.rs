use crate::core::base::*;

/// Binary selection of the map pixels lit by one lighting condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionMask {
    width: u32,
    height: u32,
    selected: Vec<bool>,
}

impl ConditionMask {
    pub fn new(width: u32, height: u32) -> Self {
        ConditionMask {
            width,
            height,
            selected: vec![false; (width * height) as usize],
        }
    }

    pub fn full(width: u32, height: u32) -> Self {
        ConditionMask {
            width,
            height,
            selected: vec![true; (width * height) as usize],
        }
    }

    /// Builds a mask from packed 8-bit RGB. A pixel is selected when all three
    /// channels are below [`MASK_THRESHOLD`].
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, LightBasisError> {
        let n = (width as usize) * (height as usize);
        if bytes.len() != 3 * n {
            return Err(LightBasisError::error("Mask size does not match resolution"));
        }
        let selected = bytes
            .chunks_exact(3)
            .map(|p| p[0] < MASK_THRESHOLD && p[1] < MASK_THRESHOLD && p[2] < MASK_THRESHOLD)
            .collect();
        return Ok(ConditionMask {
            width,
            height,
            selected,
        });
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
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        return self.selected[(y * self.width + x) as usize];
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let index = (y * self.width + x) as usize;
        self.selected[index] = value;
    }

    pub fn coverage(&self) -> usize {
        return self.selected.iter().filter(|s| **s).count();
    }

    /// Pixels selected by `residual` and by none of `others`.
    pub fn residual(residual: &ConditionMask, others: &[&ConditionMask]) -> ConditionMask {
        let mut mask = residual.clone();
        for y in 0..mask.height {
            for x in 0..mask.width {
                if !mask.is_selected(x, y) {
                    continue;
                }
                if others.iter().any(|m| m.is_selected(x, y)) {
                    mask.set(x, y, false);
                }
            }
        }
        return mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let bytes = [0, 0, 0, 200, 0, 0, 126, 126, 126, 127, 0, 0];
        let mask = ConditionMask::from_rgb8(2, 2, &bytes).unwrap();
        assert!(mask.is_selected(0, 0));
        assert!(!mask.is_selected(1, 0));
        assert!(mask.is_selected(0, 1));
        assert!(!mask.is_selected(1, 1));
        assert_eq!(mask.coverage(), 2);
        assert!(!mask.is_selected(5, 5));
    }

    #[test]
    fn test_002() {
        let residual = ConditionMask::full(3, 1);
        let mut a = ConditionMask::new(3, 1);
        a.set(0, 0, true);
        let mut b = ConditionMask::new(3, 1);
        b.set(2, 0, true);
        let r = ConditionMask::residual(&residual, &[&a, &b]);
        assert!(!r.is_selected(0, 0));
        assert!(r.is_selected(1, 0));
        assert!(!r.is_selected(2, 0));
    }
}
