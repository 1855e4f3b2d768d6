//! Computed styles for the XHTML rasterizer.
//!
//! Styles cascade in three steps: built-in element defaults, matching
//! stylesheet rules in source order, then the element's `style` attribute.

use super::css::{Declaration, Stylesheet, parse_declarations};
use quire_layout::{FontLibrary, StandardFont, TextStyle};
use quire_style::parsers::{
    parse_color, parse_font_family_list, parse_length, parse_line_height,
    parse_shorthand_margins, run_parser,
};
use quire_style::{
    Color, FontStyle, FontWeight, LineHeight, ListStyleType, Margins, StyleParseError, TextAlign,
};
use std::sync::Arc;

const LINK_COLOR: Color = Color::rgb(0, 0, 238);

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub family: Arc<str>,
    pub font_size: f32,
    pub line_height: LineHeight,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub color: Color,
    pub align: TextAlign,
    pub list_style: ListStyleType,
    pub preserve_whitespace: bool,
    pub margin: Margins,
    pub padding: Margins,
    pub background: Option<Color>,
}

impl ComputedStyle {
    pub fn root(family: &str) -> Self {
        Self {
            family: Arc::from(family),
            font_size: 12.0,
            line_height: LineHeight::Multiple(1.2),
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            color: Color::BLACK,
            align: TextAlign::Left,
            list_style: ListStyleType::Disc,
            preserve_whitespace: false,
            margin: Margins::default(),
            padding: Margins::default(),
            background: None,
        }
    }

    /// The inherited part of this style; box properties start over.
    fn inherit(&self) -> Self {
        Self {
            margin: Margins::default(),
            padding: Margins::default(),
            background: None,
            ..self.clone()
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            family: self.family.clone(),
            size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
            underline: self.underline,
            strike: self.strike,
        }
    }

    pub fn leading(&self) -> f32 {
        self.line_height.resolve(self.font_size).max(self.font_size)
    }
}

/// Applies the stylesheet to elements.
pub struct StyleResolver<'a> {
    sheet: Stylesheet,
    fonts: &'a FontLibrary,
    /// Families an `@font-face` rule declared but the library cannot draw.
    unavailable: Vec<String>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(sheet: Stylesheet, fonts: &'a FontLibrary) -> Self {
        let mut unavailable = Vec::new();
        for face in &sheet.font_faces {
            let registered = fonts.embedded().is_some_and(|font| {
                font.answers_to(&face.family)
                    || face.src.ends_with(&*font.path().to_string_lossy().replace('\\', "/"))
            });
            if !registered {
                log::warn!(
                    "@font-face '{}' ({}) is not the registered font; using fallbacks",
                    face.family,
                    face.src
                );
                unavailable.push(face.family.clone());
            }
        }
        Self {
            sheet,
            fonts,
            unavailable,
        }
    }

    /// The style of a `tag` element under `parent`.
    pub fn compute(
        &self,
        tag: &str,
        inline_style: Option<&str>,
        parent: &ComputedStyle,
    ) -> Result<ComputedStyle, StyleParseError> {
        let mut style = parent.inherit();
        apply_element_defaults(tag, &mut style);
        for declaration in self.sheet.declarations_for(tag) {
            self.apply(&mut style, declaration, parent)?;
        }
        if let Some(inline) = inline_style {
            for declaration in parse_declarations(inline)? {
                self.apply(&mut style, &declaration, parent)?;
            }
        }
        Ok(style)
    }

    fn apply(
        &self,
        style: &mut ComputedStyle,
        declaration: &Declaration,
        parent: &ComputedStyle,
    ) -> Result<(), StyleParseError> {
        let value = declaration.value.trim();
        let invalid = || StyleParseError::InvalidValue {
            property: declaration.property.clone(),
            value: value.to_string(),
        };
        match declaration.property.as_str() {
            "font-family" => {
                if let Some(family) = self.resolve_family(value) {
                    style.family = Arc::from(family.as_str());
                }
            }
            "font-size" => {
                style.font_size = font_size(value, parent.font_size).ok_or_else(invalid)?
            }
            "line-height" => style.line_height = run_parser(parse_line_height, value)?,
            "font-weight" => {
                style.bold = FontWeight::parse(value).map_err(|_| invalid())?.is_bold()
            }
            "font-style" => style.italic = FontStyle::parse(value).ok_or_else(invalid)?.is_italic(),
            "color" => style.color = run_parser(parse_color, value)?,
            "background-color" | "background" => {
                style.background = Some(run_parser(parse_color, value)?)
            }
            "text-align" => style.align = TextAlign::from_css(value).ok_or_else(invalid)?,
            "list-style-type" | "list-style" => {
                style.list_style = ListStyleType::from_css(value).ok_or_else(invalid)?
            }
            "text-decoration" => {
                let lower = value.to_ascii_lowercase();
                style.underline = lower.contains("underline");
                style.strike = lower.contains("line-through");
            }
            "white-space" => style.preserve_whitespace = value.starts_with("pre"),
            "margin" => style.margin = parse_shorthand_margins(value)?,
            "padding" => style.padding = parse_shorthand_margins(value)?,
            "margin-top" => style.margin.top = run_parser(parse_length, value)?,
            "margin-bottom" => style.margin.bottom = run_parser(parse_length, value)?,
            "margin-left" => style.margin.left = run_parser(parse_length, value)?,
            "margin-right" => style.margin.right = run_parser(parse_length, value)?,
            "padding-top" => style.padding.top = run_parser(parse_length, value)?,
            "padding-bottom" => style.padding.bottom = run_parser(parse_length, value)?,
            "padding-left" => style.padding.left = run_parser(parse_length, value)?,
            "padding-right" => style.padding.right = run_parser(parse_length, value)?,
            other => log::trace!("Ignoring unsupported property '{}'", other),
        }
        Ok(())
    }

    /// The first family in `value` that some face can draw.
    fn resolve_family(&self, value: &str) -> Option<String> {
        parse_font_family_list(value).into_iter().find(|family| {
            if self.unavailable.iter().any(|u| u.eq_ignore_ascii_case(family)) {
                return false;
            }
            self.fonts
                .embedded()
                .is_some_and(|font| font.answers_to(family))
                || StandardFont::from_family(family, false, false).is_some()
        })
    }
}

fn font_size(value: &str, parent_size: f32) -> Option<f32> {
    let value = value.trim();
    if let Some(em) = value.strip_suffix("em") {
        return em.trim().parse::<f32>().ok().map(|v| v * parent_size);
    }
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0 * parent_size);
    }
    run_parser(parse_length, value).ok().filter(|v| *v > 0.0)
}

fn apply_element_defaults(tag: &str, style: &mut ComputedStyle) {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "strong" | "b" | "th" => style.bold = true,
        "em" | "i" | "cite" => style.italic = true,
        "del" | "s" | "strike" => style.strike = true,
        "u" | "ins" => style.underline = true,
        "a" => {
            style.underline = true;
            style.color = LINK_COLOR;
        }
        "code" | "kbd" | "samp" | "tt" => style.family = Arc::from("Courier"),
        "pre" => {
            style.family = Arc::from("Courier");
            style.preserve_whitespace = true;
        }
        "ul" => style.list_style = ListStyleType::Disc,
        "ol" => style.list_style = ListStyleType::Decimal,
        "blockquote" => {
            style.margin = Margins {
                top: 6.0,
                right: 0.0,
                bottom: 6.0,
                left: 20.0,
            };
            style.color = Color::gray(64);
        }
        "hr" | "table" => {
            style.margin = Margins {
                top: 6.0,
                right: 0.0,
                bottom: 6.0,
                left: 0.0,
            }
        }
        "sup" | "sub" => style.font_size *= 0.75,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::css::parse_stylesheet;

    fn resolver<'a>(css: &str, fonts: &'a FontLibrary) -> StyleResolver<'a> {
        StyleResolver::new(parse_stylesheet(css).unwrap(), fonts)
    }

    #[test]
    fn test_cascade_order() {
        let fonts = FontLibrary::builtin();
        let r = resolver("p { margin-bottom: 6pt; color: #333333 } p { color: #ff0000 }", &fonts);
        let root = ComputedStyle::root("Times");
        let p = r.compute("p", Some("margin-bottom: 2pt"), &root).unwrap();
        assert_eq!(p.margin.bottom, 2.0);
        assert_eq!(p.color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_inheritance_keeps_text_and_resets_box() {
        let fonts = FontLibrary::builtin();
        let r = resolver("body { font-size: 12pt; line-height: 1.6; padding: 10pt 20pt }", &fonts);
        let body = r.compute("body", None, &ComputedStyle::root("Times")).unwrap();
        let p = r.compute("p", None, &body).unwrap();
        assert_eq!(p.font_size, 12.0);
        assert!((p.leading() - 19.2).abs() < 1e-3);
        assert_eq!(body.padding.left, 20.0);
        assert_eq!(p.padding, Margins::default());
    }

    #[test]
    fn test_family_fallback_skips_unregistered_font_face() {
        let fonts = FontLibrary::builtin();
        let r = resolver(
            r#"@font-face { font-family: "NotoSansCJKsc"; src: url("file:///nowhere.otf"); }
               body { font-family: "NotoSansCJKsc", serif; }"#,
            &fonts,
        );
        let body = r.compute("body", None, &ComputedStyle::root("Helvetica")).unwrap();
        assert_eq!(&*body.family, "serif");
    }

    #[test]
    fn test_element_defaults() {
        let fonts = FontLibrary::builtin();
        let r = resolver("code { font-family: monospace; }", &fonts);
        let root = ComputedStyle::root("Times");
        assert!(r.compute("strong", None, &root).unwrap().bold);
        assert!(r.compute("em", None, &root).unwrap().italic);
        assert_eq!(&*r.compute("code", None, &root).unwrap().family, "monospace");
        assert!(r.compute("pre", None, &root).unwrap().preserve_whitespace);
        assert_eq!(
            r.compute("ol", None, &root).unwrap().list_style,
            ListStyleType::Decimal
        );
    }

    #[test]
    fn test_relative_font_sizes() {
        assert_eq!(font_size("2em", 10.0), Some(20.0));
        assert_eq!(font_size("150%", 10.0), Some(15.0));
        assert_eq!(font_size("14pt", 10.0), Some(14.0));
        assert_eq!(font_size("big", 10.0), None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let fonts = FontLibrary::builtin();
        let r = resolver("p { margin-bottom: lots }", &fonts);
        assert!(r.compute("p", None, &ComputedStyle::root("Times")).is_err());
    }
}
