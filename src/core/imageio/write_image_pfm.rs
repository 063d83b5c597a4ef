use crate::core::base::*;
use crate::core::raster::*;

use std::fs::File;
use std::io::{BufWriter, Write};

/// Encodes a three channel little-endian PFM, bottom row first.
pub fn encode_pfm(image: &FloatImage) -> Vec<u8> {
    let header = format!("PF\n{} {}\n-1.0\n", image.width(), image.height());
    let mut bytes = header.into_bytes();
    bytes.reserve(12 * (image.width() * image.height()) as usize);
    for y in (0..image.height()).rev() {
        for x in 0..image.width() {
            for v in image.get(x, y) {
                bytes.extend_from_slice(&(*v as f32).to_le_bytes());
            }
        }
    }
    return bytes;
}

pub fn write_image_pfm(name: &str, image: &FloatImage) -> Result<(), LightBasisError> {
    let mut writer = BufWriter::new(File::create(name)?);
    writer.write_all(&encode_pfm(image))?;
    writer.flush()?;
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::imageio::read_image_pfm::*;

    #[test]
    fn test_001() {
        let mut image = FloatImage::new(3, 2);
        image.set(2, 0, &[1.0, 2.0, 3.0]);
        image.set(0, 1, &[Float::NAN, 0.25, 0.0]);
        let decoded = decode_pfm(&encode_pfm(&image)).unwrap();
        assert_eq!(*decoded.get(2, 0), [1.0, 2.0, 3.0]);
        assert!(decoded.get(0, 1)[0].is_nan());
        assert_eq!(decoded.get(0, 1)[1], 0.25);
    }
}
