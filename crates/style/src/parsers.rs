//! Low-level nom parser functions for CSS-like style values.
//!
//! These cover the value grammar the HTML bridge's stylesheet uses: lengths,
//! margin/padding shorthands, hex colors, line heights and family lists.

use crate::color::Color;
use crate::dimension::{MM_TO_PT, Margins};
use crate::text::LineHeight;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::{map, map_res, opt, recognize, value};
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded, terminated};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Numbers & lengths ---

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
                recognize(pair(char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("pt")),
        value(0.75, tag_no_case("px")),
        value(72.0, tag_no_case("in")),
        value(10.0 * MM_TO_PT, tag_no_case("cm")),
        value(MM_TO_PT, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length with an optional unit (e.g. "12pt", "1in", "10mm"), in points.
/// A bare number is taken as points.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    map(pair(parse_f32, opt(parse_unit)), |(v, unit)| {
        v * unit.unwrap_or(1.0)
    })
    .parse(input)
}

/// Parses a `line-height`: a bare number is a multiple of the font size.
pub fn parse_line_height(input: &str) -> IResult<&str, LineHeight> {
    alt((
        map(terminated(parse_f32, char('%')), |v| {
            LineHeight::Multiple(v / 100.0)
        }),
        map(pair(parse_f32, parse_unit), |(v, unit)| {
            LineHeight::Points(v * unit)
        }),
        map(parse_f32, LineHeight::Multiple),
    ))
    .parse(input)
}

/// Parses CSS shorthand margins (1, 2, 3 or 4 values).
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts_res = separated_list1(space1, parse_length).parse(input.trim());

    match parts_res {
        Ok(("", parts)) => match parts.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins::symmetric(*y, *x)),
            [top, x, bottom] => Ok(Margins {
                top: *top,
                right: *x,
                bottom: *bottom,
                left: *x,
            }),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for margin/padding shorthand: got {}, expected 1 to 4.",
                parts.len()
            ))),
        },
        _ => Err(StyleParseError::Parse(format!(
            "Failed to parse margins value: '{}'",
            input
        ))),
    }
}

// --- Colors ---

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )
    .parse(input)
}

fn hex_single(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16).map(|v| v * 17),
    )
    .parse(input)
}

fn hex_color_6(input: &str) -> IResult<&str, Color> {
    map(
        pair(hex_pair, pair(hex_pair, hex_pair)),
        |(r, (g, b))| Color::rgb(r, g, b),
    )
    .parse(input)
}

fn hex_color_3(input: &str) -> IResult<&str, Color> {
    map(
        pair(hex_single, pair(hex_single, hex_single)),
        |(r, (g, b))| Color::rgb(r, g, b),
    )
    .parse(input)
}

/// Parses a hex color (e.g., "#f0f0f0" or "#333") or one of a few keywords.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((
        preceded(char('#'), alt((hex_color_6, hex_color_3))),
        value(Color::BLACK, tag_no_case("black")),
        value(Color::WHITE, tag_no_case("white")),
        value(Color::gray(128), tag_no_case("gray")),
        value(Color::gray(128), tag_no_case("grey")),
    ))
    .parse(input)
}

// --- Families ---

/// Splits a `font-family` list, dropping quotes and empty entries.
pub fn parse_font_family_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs a nom parser over the whole of `input` (surrounding spaces allowed).
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: FnMut(&'a str) -> IResult<&'a str, T>,
{
    match terminated(preceded(space0, |i| parser(i)), space0).parse(input) {
        Ok(("", result)) => Ok(result),
        Ok((rest, _)) => Err(StyleParseError::Parse(format!(
            "Unexpected trailing input '{}' in '{}'",
            rest, input
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}
