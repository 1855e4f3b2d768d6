use crate::block::HeadingLevel;

/// Classification of a single source line.
///
/// This is the only place where line prefixes are inspected. The parser folds
/// the resulting kinds into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: HeadingLevel, text: &'a str },
    Bullet { item: &'a str },
    Text,
}

/// Classifies a line. Trailing whitespace is ignored; leading whitespace is not,
/// so an indented `  - x` is plain text unless the caller trims it first.
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim_end();
    if line.is_empty() {
        return LineKind::Blank;
    }

    let hashes = line.len() - line.trim_start_matches('#').len();
    if let Some(level) = HeadingLevel::from_marker_len(hashes) {
        if let Some(rest) = strip_marker(&line[hashes - 1..], '#') {
            return LineKind::Heading {
                level,
                text: rest.trim(),
            };
        }
    }

    if let Some(rest) = strip_marker(line, '-') {
        return LineKind::Bullet { item: rest.trim() };
    }

    LineKind::Text
}

/// Strips exactly one `marker` followed by a whitespace character.
fn strip_marker(line: &str, marker: char) -> Option<&str> {
    let rest = line.strip_prefix(marker)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c == ' ' || c == '\t' => Some(chars.as_str()),
        _ => None,
    }
}
