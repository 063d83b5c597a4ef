use crate::core::base::*;
use crate::core::raster::*;

use image::*;

impl From<image::ImageError> for LightBasisError {
    fn from(value: image::ImageError) -> Self {
        let msg = value.to_string();
        return LightBasisError::error(&msg);
    }
}

fn to_byte(v: Float) -> u8 {
    if v.is_nan() {
        return 0;
    }
    Float::clamp(255.0 * v, 0.0, 255.0) as u8
}

/// Writes packed 8-bit RGB.
pub fn write_image_bytes(
    name: &str,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
) -> Result<(), LightBasisError> {
    let img = match RgbImage::from_vec(width, height, bytes) {
        Some(img) => img,
        None => {
            return Err(LightBasisError::error(
                "write_image: buffer does not match resolution",
            ));
        }
    };
    img.save(name)?;
    return Ok(());
}

/// Writes a float image as 8-bit, clamping to `[0, 1]`. NaN becomes black.
pub fn write_image(name: &str, image: &FloatImage) -> Result<(), LightBasisError> {
    let bytes = image.to_interleaved().into_iter().map(to_byte).collect();
    return write_image_bytes(name, bytes, image.width(), image.height());
}
