use super::read_image_pfm::*;
use crate::core::base::*;
use crate::core::raster::*;

use image::*;
use log::info;
use std::path::Path;

type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

fn convert_from_rgb8(img: &image::RgbImage) -> Vec<RGB> {
    return img
        .pixels()
        .map(|p| {
            [
                p[0] as Float / 255.0,
                p[1] as Float / 255.0,
                p[2] as Float / 255.0,
            ]
        })
        .collect();
}

fn convert_from_rgb16(img: &Rgb16Image) -> Vec<RGB> {
    return img
        .pixels()
        .map(|p| {
            [
                p[0] as Float / 65535.0,
                p[1] as Float / 65535.0,
                p[2] as Float / 65535.0,
            ]
        })
        .collect();
}

fn convert_from_rgb32f(img: &image::Rgb32FImage) -> Vec<RGB> {
    return img
        .pixels()
        .map(|p| [p[0] as Float, p[1] as Float, p[2] as Float])
        .collect();
}

/// Decodes any raster format the `image` crate knows. Integer formats are
/// scaled to `[0, 1]`; no gamma is removed.
pub fn read_image_common(path: &Path) -> Result<FloatImage, LightBasisError> {
    let dimg = image::open(path)?;
    let (width, height) = dimg.dimensions();
    let pixels = match &dimg {
        DynamicImage::ImageRgb32F(img) => convert_from_rgb32f(img),
        DynamicImage::ImageRgba32F(_) => convert_from_rgb32f(&dimg.to_rgb32f()),
        DynamicImage::ImageRgb16(img) => convert_from_rgb16(img),
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) | DynamicImage::ImageRgba16(_) => {
            convert_from_rgb16(&dimg.to_rgb16())
        }
        _ => convert_from_rgb8(&dimg.to_rgb8()),
    };
    return FloatImage::from_pixels(width, height, pixels);
}

fn has_extension(path: &Path, ext: &str) -> bool {
    return path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false);
}

pub fn read_image(name: &str) -> Result<FloatImage, LightBasisError> {
    let path = Path::new(name);
    if !path.exists() {
        return Err(LightBasisError::from(format!("File not found: {}", name)));
    }
    if has_extension(path, "pfm") {
        return read_image_pfm(name);
    } else {
        let image = read_image_common(path)?;
        info!(
            "Read image {} ({}x{}) resolution",
            name,
            image.width(),
            image.height()
        );
        return Ok(image);
    }
}

/// Reads an 8-bit mask; see [`ConditionMask::from_rgb8`] for the selection rule.
pub fn read_mask(name: &str) -> Result<ConditionMask, LightBasisError> {
    let path = Path::new(name);
    if !path.exists() {
        return Err(LightBasisError::from(format!("File not found: {}", name)));
    }
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    return ConditionMask::from_rgb8(width, height, img.as_raw());
}
