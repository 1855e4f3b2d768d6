//! List marker styles.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyleType {
    #[default]
    Disc,
    Decimal,
    None,
}

impl ListStyleType {
    /// Marker text for the item at zero-based `index`, or `None` for unmarked lists.
    pub fn marker(self, index: usize, start: u64) -> Option<String> {
        match self {
            ListStyleType::Disc => Some("\u{2022}".to_string()),
            ListStyleType::Decimal => Some(format!("{}.", start + index as u64)),
            ListStyleType::None => None,
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disc" | "circle" | "square" => Some(ListStyleType::Disc),
            "decimal" => Some(ListStyleType::Decimal),
            "none" => Some(ListStyleType::None),
            _ => None,
        }
    }
}
