use super::lighting_basis::*;
use crate::core::base::*;

use nom::bytes::complete::tag;
use nom::character::complete::{digit1, i32 as parse_i32, multispace0, multispace1, space1};
use nom::combinator::{all_consuming, map_res};
use nom::multi::{count, many0};
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;

use log::info;
use std::fs::File;
use std::io::{BufWriter, Read, Write};

fn read_index(s: &str) -> IResult<&str, usize> {
    return map_res(digit1, |d: &str| d.parse::<usize>())(s);
}

fn read_basis_line(s: &str) -> IResult<&str, (usize, Point2i)> {
    let (s, (index, _, x, _, y)) = preceded(
        multispace0,
        tuple((read_index, tag(":"), preceded(space1, parse_i32), space1, parse_i32)),
    )(s)?;
    return Ok((s, (index, Point2i::new(x, y))));
}

fn read_group(s: &str) -> IResult<&str, Vec<usize>> {
    let (s, n) = preceded(multispace0, read_index)(s)?;
    return count(preceded(multispace1, read_index), n)(s);
}

/// Parses `"<index>: <x> <y>"` lines. Positions are returned in file order;
/// the leading index is informational.
pub fn parse_basis(text: &str) -> Result<Vec<Point2i>, LightBasisError> {
    match all_consuming(terminated(many0(read_basis_line), multispace0))(text) {
        Ok((_, lines)) => Ok(lines.into_iter().map(|(_, p)| p).collect()),
        Err(e) => Err(LightBasisError::from(format!("Malformed basis file: {}", e))),
    }
}

pub fn format_basis(positions: &[Point2i]) -> String {
    let mut text = String::new();
    for (i, p) in positions.iter().enumerate() {
        text += &format!("{}: {} {}\n", i, p.x, p.y);
    }
    return text;
}

/// Parses the cell grouping: per condition a count followed by that many
/// cell indices, all whitespace separated.
pub fn parse_grouping(text: &str) -> Result<Vec<Vec<usize>>, LightBasisError> {
    match all_consuming(terminated(many0(read_group), multispace0))(text) {
        Ok((_, groups)) => Ok(groups),
        Err(e) => Err(LightBasisError::from(format!("Malformed grouping file: {}", e))),
    }
}

pub fn format_grouping(groups: &[Vec<usize>]) -> String {
    let lines: Vec<String> = groups
        .iter()
        .map(|g| {
            let mut line = g.len().to_string();
            for c in g.iter() {
                line += &format!(" {}", c);
            }
            line
        })
        .collect();
    return lines.join("\n");
}

fn read_text(path: &str) -> Result<String, LightBasisError> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    return Ok(text);
}

fn write_text(path: &str, text: &str) -> Result<(), LightBasisError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    return Ok(());
}

pub fn save_basis(path: &str, basis: &LightingBasis) -> Result<(), LightBasisError> {
    write_text(path, &format_basis(basis.point_lights()))?;
    info!(
        "Saved {} point lights to {}",
        basis.number_of_point_lights(),
        path
    );
    return Ok(());
}

/// Appends the lights stored in `path` to `basis`. Clear the basis first
/// for a fresh load. Returns the indices assigned.
pub fn load_basis(path: &str, basis: &mut LightingBasis) -> Result<Vec<usize>, LightBasisError> {
    let positions = load_basis_positions(path)?;
    let added = basis.add_point_lights(&positions);
    info!("Loaded {} point lights from {}", added.len(), path);
    return Ok(added);
}

/// Stored light positions in file order, without bounds checks.
pub fn load_basis_positions(path: &str) -> Result<Vec<Point2i>, LightBasisError> {
    return parse_basis(&read_text(path)?);
}

pub fn save_grouping(path: &str, groups: &[Vec<usize>]) -> Result<(), LightBasisError> {
    return write_text(path, &format_grouping(groups));
}

pub fn load_grouping(path: &str) -> Result<Vec<Vec<usize>>, LightBasisError> {
    return parse_grouping(&read_text(path)?);
}
