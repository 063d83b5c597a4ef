use crate::core::base::*;

use std::fs::File;
use std::io::{BufWriter, Write};

/// One `"<k>: <r> <g> <b>"` line per condition.
pub fn format_weights(weights: &[RGBWeight]) -> String {
    let mut text = String::new();
    for (k, w) in weights.iter().enumerate() {
        text += &format!("{}: {} {} {}\n", k, w[0], w[1], w[2]);
    }
    return text;
}

pub fn save_weights(path: &str, weights: &[RGBWeight]) -> Result<(), LightBasisError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(format_weights(weights).as_bytes())?;
    writer.flush()?;
    return Ok(());
}
