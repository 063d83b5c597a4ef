use crate::core::base::*;
use crate::core::imageio::*;
use crate::core::raster::*;

use log::{debug, warn};
use std::path::PathBuf;

/// Photographs of an object, one per lighting condition, combined linearly
/// into a relit image.
#[derive(Debug, Clone, Default)]
pub struct ReflectanceField {
    images: Vec<Option<FloatImage>>,
    /// Dark (selected) pixels belong to the object, the rest is background.
    object_mask: Option<ConditionMask>,
}

impl ReflectanceField {
    pub fn new(images: Vec<Option<FloatImage>>, object_mask: Option<ConditionMask>) -> Self {
        ReflectanceField {
            images,
            object_mask,
        }
    }

    /// Loads the listed images. Missing or unreadable entries stay empty.
    pub fn load(paths: &[Option<PathBuf>], object_mask: Option<&PathBuf>) -> Self {
        let mut images = Vec::with_capacity(paths.len());
        for (k, path) in paths.iter().enumerate() {
            let image = match path {
                Some(path) => match read_image(&path.to_string_lossy()) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        warn!("Skipping reflectance image {}: {}", k, e);
                        None
                    }
                },
                None => None,
            };
            images.push(image);
        }
        let object_mask = match object_mask {
            Some(path) => match read_mask(&path.to_string_lossy()) {
                Ok(mask) => Some(mask),
                Err(e) => {
                    warn!("Skipping object mask: {}", e);
                    None
                }
            },
            None => None,
        };
        return ReflectanceField::new(images, object_mask);
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.images.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.images.iter().all(|i| i.is_none());
    }

    #[inline]
    pub fn get(&self, condition: usize) -> Option<&FloatImage> {
        return self.images.get(condition).and_then(|i| i.as_ref());
    }

    pub fn object_mask(&self) -> Option<&ConditionMask> {
        return self.object_mask.as_ref();
    }

    /// Sum of every image scaled channel-wise by its condition weight.
    /// Conditions without an image or a weight, and images whose size differs
    /// from the first one, are skipped with a warning. `None` when no image
    /// is present.
    pub fn relight(&self, weights: &[RGBWeight]) -> Option<FloatImage> {
        let first = self.images.iter().flatten().next()?;
        let mut result = FloatImage::new(first.width(), first.height());
        for k in 0..self.images.len().max(weights.len()) {
            let image = match self.get(k) {
                Some(image) => image,
                None => {
                    warn!("No reflectance image for condition {}", k);
                    continue;
                }
            };
            let weight = match weights.get(k) {
                Some(weight) => weight,
                None => {
                    warn!("No weight for condition {}", k);
                    continue;
                }
            };
            if let Err(e) = result.add_weighted(image, weight) {
                warn!("Skipping reflectance image of condition {}: {}", k, e);
            }
        }
        debug!("Relit {} conditions", self.images.len());
        return Some(result);
    }
}

/// Scales the image by `2^exposure`.
pub fn change_exposure(image: &mut FloatImage, exposure: Float) {
    image.scale((2.0 as Float).powf(exposure));
}

/// Direction through the center of pixel `(x, y)` of a pinhole camera
/// looking down `-z`, with `y` up. `field_of_view` is the angle in degrees
/// covered by each image axis.
pub fn camera_ray(x: u32, y: u32, width: u32, height: u32, field_of_view: Float) -> [f64; 3] {
    let scale = (0.5 * (field_of_view as f64).to_radians()).tan();
    let half_width = 0.5 * width as f64;
    let half_height = 0.5 * height as f64;
    let dx = (x as f64 - half_width) / half_width * scale;
    let dy = -(y as f64 - half_height) / half_height * scale;
    let dz = -1.0;
    let r = (dx * dx + dy * dy + dz * dz).sqrt();
    return [dx / r, dy / r, dz / r];
}

/// Pixel of a `width x height` latitude-longitude map seen along the unit
/// direction `d`, after rotating the map by `offset` radians.
pub fn lat_long_pixel(d: &[f64; 3], offset: Float, width: u32, height: u32) -> (u32, u32) {
    let theta = d[1].clamp(-1.0, 1.0).acos();
    let two_pi = 2.0 * std::f64::consts::PI;
    let phi = modulo_real(d[0].atan2(d[2]) + offset as f64, two_pi);
    let i = ((height as f64 * theta / std::f64::consts::PI).floor() as i64).clamp(0, height as i64 - 1);
    let j = ((width as f64 * phi / two_pi).floor() as i64).clamp(0, width as i64 - 1);
    return (j as u32, i as u32);
}

impl ReflectanceField {
    /// Replaces the background pixels of `image` with the rotated environment
    /// map seen through the camera. Nothing happens without an object mask
    /// of the image's size.
    pub fn composite_background(&self, image: &mut FloatImage, map: &FloatImage, offset: Float, field_of_view: Float) {
        let mask = match self.object_mask.as_ref() {
            Some(mask) => mask,
            None => return,
        };
        if mask.width() != image.width() || mask.height() != image.height() {
            warn!(
                "Object mask is {}x{} but the relit image is {}x{}",
                mask.width(),
                mask.height(),
                image.width(),
                image.height()
            );
            return;
        }
        if map.width() == 0 || map.height() == 0 {
            return;
        }
        let width = image.width();
        let height = image.height();
        for y in 0..height {
            for x in 0..width {
                if mask.is_selected(x, y) {
                    continue;
                }
                let d = camera_ray(x, y, width, height, field_of_view);
                let (j, i) = lat_long_pixel(&d, offset, map.width(), map.height());
                image.set(x, y, map.get(j, i));
            }
        }
    }
}
