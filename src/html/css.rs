//! A parser for the stylesheet subset the envelope uses: type selectors,
//! comma-separated selector lists, plain declarations and `@font-face`.

use nom::IResult;
use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till, take_till1};
use nom::character::complete::{char, multispace0};
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, terminated};
use quire_style::StyleParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Lowercased selectors of the comma list.
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// True when a type selector in the list names `tag` (or is `*`).
    pub fn matches(&self, tag: &str) -> bool {
        self.selectors
            .iter()
            .any(|s| s == "*" || s.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    /// The `src` location with any `url(...)` wrapper and quotes removed.
    pub src: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub font_faces: Vec<FontFace>,
}

impl Stylesheet {
    /// Declarations of every rule matching `tag`, in source order.
    pub fn declarations_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Declaration> {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(tag))
            .flat_map(|rule| rule.declarations.iter())
    }
}

enum Item<'a> {
    Rule { selectors: &'a str, body: &'a str },
    FontFace(&'a str),
}

fn block(input: &str) -> IResult<&str, &str> {
    delimited(char('{'), take_till(|c| c == '}'), char('}')).parse(input)
}

fn font_face(input: &str) -> IResult<&str, Item<'_>> {
    map(
        preceded(terminated(tag_no_case("@font-face"), multispace0), block),
        Item::FontFace,
    )
    .parse(input)
}

fn rule(input: &str) -> IResult<&str, Item<'_>> {
    map(
        pair(take_till1(|c| matches!(c, '{' | '}' | '@' | ';')), block),
        |(selectors, body)| Item::Rule { selectors, body },
    )
    .parse(input)
}

fn items(input: &str) -> IResult<&str, Vec<Item<'_>>> {
    terminated(
        many0(preceded(multispace0, alt((font_face, rule)))),
        multispace0,
    )
    .parse(input)
}

/// Splits a declaration block on `;`. Empty entries are allowed; an entry
/// without a `:` is an error.
pub fn parse_declarations(body: &str) -> Result<Vec<Declaration>, StyleParseError> {
    let mut out = Vec::new();
    for entry in body.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (property, value) = entry.split_once(':').ok_or_else(|| {
            StyleParseError::Parse(format!("Declaration without ':' in '{}'", entry))
        })?;
        let property = property.trim().to_ascii_lowercase();
        if property.is_empty() || property.contains(char::is_whitespace) {
            return Err(StyleParseError::Parse(format!(
                "Invalid property name in '{}'",
                entry
            )));
        }
        out.push(Declaration {
            property,
            value: value.trim().to_string(),
        });
    }
    Ok(out)
}

fn strip_comments(input: &str) -> Result<String, StyleParseError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("*/")
            .ok_or_else(|| StyleParseError::Parse("Unterminated comment".to_string()))?;
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn unwrap_url(value: &str) -> String {
    let value = value.trim();
    let inner = value
        .strip_prefix("url(")
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value);
    inner.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Parses a whole stylesheet. Anything outside the supported subset that
/// cannot be skipped is an error.
pub fn parse_stylesheet(input: &str) -> Result<Stylesheet, StyleParseError> {
    let text = strip_comments(input)?;
    let (rest, parsed) = items(&text).map_err(|e| StyleParseError::Parse(e.to_string()))?;
    if !rest.is_empty() {
        let snippet: String = rest.chars().take(40).collect();
        return Err(StyleParseError::Parse(format!(
            "Unexpected stylesheet content near '{}'",
            snippet
        )));
    }

    let mut sheet = Stylesheet::default();
    for item in parsed {
        match item {
            Item::Rule { selectors, body } => {
                let selectors: Vec<String> = selectors
                    .split(',')
                    .map(|s| s.trim().to_ascii_lowercase())
                    .collect();
                if selectors.iter().any(String::is_empty) {
                    return Err(StyleParseError::Parse(format!(
                        "Empty selector in '{}'",
                        selectors.join(",")
                    )));
                }
                sheet.rules.push(Rule {
                    selectors,
                    declarations: parse_declarations(body)?,
                });
            }
            Item::FontFace(body) => {
                let declarations = parse_declarations(body)?;
                let find = |name: &str| {
                    declarations
                        .iter()
                        .find(|d| d.property == name)
                        .map(|d| d.value.as_str())
                };
                let (Some(family), Some(src)) = (find("font-family"), find("src")) else {
                    return Err(StyleParseError::Parse(
                        "@font-face needs font-family and src".to_string(),
                    ));
                };
                sheet.font_faces.push(FontFace {
                    family: family.trim_matches(|c| c == '"' || c == '\'').to_string(),
                    src: unwrap_url(src),
                });
            }
        }
    }
    Ok(sheet)
}
