//! Page size, margins and the page geometry built from them.
use crate::parsers::parse_shorthand_margins;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical `y` and horizontal `x`, as in the two-value CSS shorthand.
    pub fn symmetric(y: f32, x: f32) -> Self {
        Self {
            top: y,
            right: x,
            bottom: y,
            left: x,
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string like '20mm' or '10pt 20pt', a number, or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                parse_shorthand_margins(value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Parse a page size name (e.g., "A4", "Letter", "Legal").
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

/// Fixed page geometry shared by every page of a document.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default = "PageGeometry::default_margins")]
    pub margins: Margins,
}

impl Default for PageGeometry {
    /// A4 with 20 mm on every side.
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margins: Self::default_margins(),
        }
    }
}

impl PageGeometry {
    fn default_margins() -> Margins {
        Margins::all(20.0 * MM_TO_PT)
    }

    pub fn page_width(&self) -> f32 {
        self.size.dimensions_pt().0
    }

    pub fn page_height(&self) -> f32 {
        self.size.dimensions_pt().1
    }

    pub fn content_width(&self) -> f32 {
        self.page_width() - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f32 {
        self.page_height() - self.margins.top - self.margins.bottom
    }

    /// Top edge of the content area, measured from the top of the page.
    pub fn content_top(&self) -> f32 {
        self.margins.top
    }

    /// Bottom edge of the content area, measured from the top of the page.
    pub fn content_bottom(&self) -> f32 {
        self.page_height() - self.margins.bottom
    }

    /// True when there is a positive area to lay content into.
    pub fn has_content_area(&self) -> bool {
        let (w, h) = self.size.dimensions_pt();
        w > 0.0
            && h > 0.0
            && self.content_width() > 0.0
            && self.content_height() > 0.0
            && w.is_finite()
            && h.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_is_a4_with_20mm() {
        let g = PageGeometry::default();
        assert_eq!(g.size, PageSize::A4);
        assert!((g.margins.left - 56.69).abs() < 0.01);
        assert!((g.content_width() - (595.28 - 2.0 * 56.6929)).abs() < 0.01);
        assert!(g.has_content_area());
    }

    #[test]
    fn test_zero_page_has_no_content_area() {
        let g = PageGeometry {
            size: PageSize::Custom {
                width: 0.0,
                height: 0.0,
            },
            margins: Margins::default(),
        };
        assert!(!g.has_content_area());

        let squeezed = PageGeometry {
            size: PageSize::A4,
            margins: Margins::all(400.0),
        };
        assert!(!squeezed.has_content_area());
    }

    #[test]
    fn test_margins_deserialize_shorthand_and_map() {
        let m: Margins = serde_json::from_str("\"10pt 20pt\"").unwrap();
        assert_eq!(m, Margins::symmetric(10.0, 20.0));

        let m: Margins = serde_json::from_str(r#"{"top": 5, "left": 7}"#).unwrap();
        assert_eq!(m.top, 5.0);
        assert_eq!(m.left, 7.0);
        assert_eq!(m.right, 0.0);
    }

    #[test]
    fn test_geometry_deserialize() {
        let g: PageGeometry =
            serde_json::from_str(r#"{"size": "Letter", "margins": "1in"}"#).unwrap();
        assert_eq!(g.size, PageSize::Letter);
        assert_eq!(g.margins, Margins::all(72.0));

        let g: PageGeometry = serde_json::from_str("{}").unwrap();
        assert_eq!(g, PageGeometry::default());
    }
}
