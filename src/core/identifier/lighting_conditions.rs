use crate::core::imageio::*;
use crate::core::raster::*;

use log::warn;
use std::path::PathBuf;

/// One optional image per lighting condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightingConditions {
    images: Vec<Option<FloatImage>>,
}

impl LightingConditions {
    pub fn new(number_of_conditions: usize) -> Self {
        LightingConditions {
            images: vec![None; number_of_conditions],
        }
    }

    pub fn from_images(images: Vec<Option<FloatImage>>) -> Self {
        LightingConditions { images }
    }

    /// Loads every listed image. Unreadable or unlisted entries stay empty
    /// and are reported with a warning.
    pub fn load(paths: &[Option<PathBuf>], number_of_conditions: usize) -> Self {
        let mut conditions = LightingConditions::new(number_of_conditions.max(paths.len()));
        for k in 0..conditions.len() {
            let path = match paths.get(k).and_then(|p| p.as_ref()) {
                Some(path) => path,
                None => {
                    warn!("No image for lighting condition {}", k);
                    continue;
                }
            };
            match read_image(&path.to_string_lossy()) {
                Ok(image) => conditions.set(k, image),
                Err(e) => warn!("Skipping lighting condition {}: {}", k, e),
            }
        }
        return conditions;
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.images.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.images.is_empty();
    }

    #[inline]
    pub fn get(&self, condition: usize) -> Option<&FloatImage> {
        return self.images.get(condition).and_then(|i| i.as_ref());
    }

    pub fn set(&mut self, condition: usize, image: FloatImage) {
        if condition >= self.images.len() {
            self.images.resize(condition + 1, None);
        }
        self.images[condition] = Some(image);
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&FloatImage>> {
        return self.images.iter().map(|i| i.as_ref());
    }

    /// Subtracts the indirect-light condition from every other condition and
    /// clamps negative values to zero. Conditions of another size are left
    /// untouched.
    pub fn remove_indirect_light(&mut self, indirect: usize) {
        let dark = match self.get(indirect) {
            Some(image) => image.clone(),
            None => {
                warn!("Indirect light condition {} has no image", indirect);
                return;
            }
        };
        for (k, image) in self.images.iter_mut().enumerate() {
            if k == indirect {
                continue;
            }
            let image = match image.as_mut() {
                Some(image) => image,
                None => continue,
            };
            if !image.same_resolution(&dark) {
                warn!(
                    "Condition {} is {}x{}, indirect light is {}x{}; not subtracted",
                    k,
                    image.width(),
                    image.height(),
                    dark.width(),
                    dark.height()
                );
                continue;
            }
            if let Err(e) = image.subtract_clamped(&dark) {
                warn!("Condition {}: {}", k, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut conditions = LightingConditions::new(2);
        conditions.set(0, FloatImage::constant(2, 2, &[3.0, 3.0, 3.0]));
        conditions.set(2, FloatImage::constant(2, 2, &[1.0, 4.0, 0.5]));
        assert_eq!(conditions.len(), 3);
        assert!(conditions.get(1).is_none());
        assert!(conditions.get(7).is_none());
        conditions.remove_indirect_light(2);
        assert_eq!(*conditions.get(0).unwrap().get(0, 0), [2.0, 0.0, 2.5]);
        assert_eq!(*conditions.get(2).unwrap().get(0, 0), [1.0, 4.0, 0.5]);
    }

    #[test]
    fn test_002() {
        let mut conditions = LightingConditions::new(3);
        conditions.set(0, FloatImage::constant(16, 8, &[3.0, 3.0, 3.0]));
        conditions.set(1, FloatImage::constant(8, 8, &[1.0, 1.0, 1.0]));
        conditions.set(2, FloatImage::constant(8, 8, &[2.0, 0.5, 1.0]));
        conditions.remove_indirect_light(1);
        assert_eq!(*conditions.get(0).unwrap().get(15, 7), [3.0, 3.0, 3.0]);
        assert_eq!(*conditions.get(2).unwrap().get(0, 0), [1.0, 0.0, 0.0]);
    }
}
