use crate::core::base::*;
use crate::core::raster::*;

use nom::character::complete::{alphanumeric1, multispace0, one_of};
use nom::error::*;
use nom::number::complete::*;
use nom::sequence;
use nom::IResult;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

fn read_word(s: &[u8]) -> IResult<&[u8], &[u8]> {
    let (s, word) = sequence::delimited(multispace0, alphanumeric1, multispace0)(s)?;
    return Ok((s, word));
}

fn read_value(s: &[u8]) -> IResult<&[u8], &[u8]> {
    let (s, word) = sequence::preceded(multispace0, recognize_float)(s)?;
    return Ok((s, word));
}

fn parse_value<'a, T: std::str::FromStr>(
    input: &'a [u8],
    word: &'a [u8],
) -> Result<T, nom::Err<Error<&'a [u8]>>> {
    return std::str::from_utf8(word)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| nom::Err::Failure(Error::new(input, ErrorKind::Float)));
}

fn read_image_pfm_core(input: &[u8]) -> IResult<&[u8], FloatImage> {
    // read either "Pf" or "PF"
    let (input, cc) = read_word(input)?;
    let n_channels = match cc {
        b"Pf" => 1,
        b"PF" => 3,
        _ => {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Tag)));
        }
    };

    let (input, width) = read_value(input)?;
    let width = parse_value::<u32>(input, width)?;
    let (input, height) = read_value(input)?;
    let height = parse_value::<u32>(input, height)?;
    let (input, scale) = read_value(input)?;
    let scale = parse_value::<f32>(input, scale)?;
    // exactly one whitespace byte separates the header from the raster
    let (input, _) = one_of::<_, _, Error<&[u8]>>(" \t\r\n")(input)?;

    // negative scale means little endian
    let file_little_endian = scale < 0.0;
    let scale = scale.abs();

    // the raster must be present before anything is allocated for it
    let pixels = (width as usize).checked_mul(height as usize);
    let expected = pixels
        .and_then(|n| n.checked_mul(n_channels))
        .and_then(|n| n.checked_mul(4));
    let pixels = match (pixels, expected) {
        (Some(pixels), Some(expected)) if input.len() >= expected => pixels,
        _ => {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Eof)));
        }
    };

    let mut data = vec![[0.0 as Float; 3]; pixels];
    let mut input = input;
    // Flip in Y, as P*M has the origin at the lower left.
    for y in 0..height {
        let yy = height - y - 1;
        for x in 0..width {
            let index = (yy * width + x) as usize;
            let mut rgb = [0.0 as Float; 3];
            for c in 0..n_channels {
                let (inp, f) = if file_little_endian {
                    le_f32::<_, Error<&[u8]>>(input)?
                } else {
                    be_f32::<_, Error<&[u8]>>(input)?
                };
                rgb[c] = (f * scale) as Float;
                input = inp;
            }
            if n_channels == 1 {
                rgb = [rgb[0], rgb[0], rgb[0]];
            }
            data[index] = rgb;
        }
    }

    match FloatImage::from_pixels(width, height, data) {
        Ok(image) => Ok((input, image)),
        Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

/// Decodes PFM bytes. Scale magnitudes other than one are multiplied in.
pub fn decode_pfm(bytes: &[u8]) -> Result<FloatImage, LightBasisError> {
    match read_image_pfm_core(bytes) {
        Ok((_, image)) => Ok(image),
        Err(_) => Err(LightBasisError::error("Malformed PFM data")),
    }
}

pub fn read_image_pfm(name: &str) -> Result<FloatImage, LightBasisError> {
    let path = Path::new(name);
    let mut reader = BufReader::new(File::open(path)?);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    match read_image_pfm_core(&bytes) {
        Ok((_, image)) => {
            info!(
                "Read PFM image {} ({}x{}) resolution",
                name,
                image.width(),
                image.height()
            );
            return Ok(image);
        }
        Err(_) => {
            let msg = format!("Error reading PFM file \"{}\"", path.display());
            return Err(LightBasisError::error(&msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pfm(header: &str, values: &[f32], little: bool) -> Vec<u8> {
        let mut bytes = header.as_bytes().to_vec();
        for v in values {
            if little {
                bytes.extend_from_slice(&v.to_le_bytes());
            } else {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        }
        return bytes;
    }

    #[test]
    fn test_001() {
        // bottom row first
        let values = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0];
        let bytes = make_pfm("PF\n2 2\n-1.0\n", &values, true);
        let image = decode_pfm(&bytes).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(*image.get(0, 1), [1.0, 1.0, 1.0]);
        assert_eq!(*image.get(1, 0), [4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_002() {
        let bytes = make_pfm("Pf\n2 1\n2.0\n", &[0.5, 1.5], false);
        let image = decode_pfm(&bytes).unwrap();
        assert_eq!(*image.get(1, 0), [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_003() {
        assert!(decode_pfm(b"P6\n2 2\n255\n").is_err());
        let truncated = make_pfm("PF\n2 2\n-1.0\n", &[1.0, 2.0], true);
        assert!(decode_pfm(&truncated).is_err());
    }

    #[test]
    fn test_004() {
        assert!(decode_pfm(b"PF\n4294967295 4294967295\n-1.0\n").is_err());
        let short = make_pfm("Pf\n100000 100000\n-1.0\n", &[1.0; 8], true);
        assert!(decode_pfm(&short).is_err());
    }
}
