//! Built-in metrics for the PDF standard fonts.
//!
//! Standard fonts are never embedded; viewers supply them. Widths come from the
//! Adobe font metrics for printable ASCII, in thousandths of an em. Text drawn
//! with them is encoded as WinAnsi.

/// The base-14 faces the layout engine can draw without embedding anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

impl StandardFont {
    /// Maps a CSS/report family name onto a standard face, if it names one.
    pub fn from_family(family: &str, bold: bool, italic: bool) -> Option<Self> {
        let family = match family.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans-serif" | "sans" => Family::Helvetica,
            "times" | "times-roman" | "times new roman" | "serif" => Family::Times,
            "courier" | "courier new" | "monospace" => Family::Courier,
            _ => return None,
        };
        Some(Self::styled(family, bold, italic))
    }

    fn styled(family: Family, bold: bool, italic: bool) -> Self {
        use StandardFont::*;
        match (family, bold, italic) {
            (Family::Helvetica, false, false) => Helvetica,
            (Family::Helvetica, true, false) => HelveticaBold,
            (Family::Helvetica, false, true) => HelveticaOblique,
            (Family::Helvetica, true, true) => HelveticaBoldOblique,
            (Family::Times, false, false) => TimesRoman,
            (Family::Times, true, false) => TimesBold,
            (Family::Times, false, true) => TimesItalic,
            (Family::Times, true, true) => TimesBoldItalic,
            (Family::Courier, false, false) => Courier,
            (Family::Courier, true, false) => CourierBold,
            (Family::Courier, false, true) => CourierOblique,
            (Family::Courier, true, true) => CourierBoldOblique,
        }
    }

    /// The same family in the given weight and slant.
    pub fn with_style(self, bold: bool, italic: bool) -> Self {
        Self::styled(self.family(), bold, italic)
    }

    fn family(self) -> Family {
        use StandardFont::*;
        match self {
            Helvetica | HelveticaBold | HelveticaOblique | HelveticaBoldOblique => {
                Family::Helvetica
            }
            TimesRoman | TimesBold | TimesItalic | TimesBoldItalic => Family::Times,
            Courier | CourierBold | CourierOblique | CourierBoldOblique => Family::Courier,
        }
    }

    pub fn postscript_name(self) -> &'static str {
        use StandardFont::*;
        match self {
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Courier => "Courier",
            CourierBold => "Courier-Bold",
            CourierOblique => "Courier-Oblique",
            CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn is_bold(self) -> bool {
        use StandardFont::*;
        matches!(
            self,
            HelveticaBold
                | HelveticaBoldOblique
                | TimesBold
                | TimesBoldItalic
                | CourierBold
                | CourierBoldOblique
        )
    }

    /// Ascender in thousandths of an em.
    pub fn ascent(self) -> f32 {
        match self.family() {
            Family::Helvetica => 718.0,
            Family::Times => 683.0,
            Family::Courier => 629.0,
        }
    }

    /// Descender in thousandths of an em (negative).
    pub fn descent(self) -> f32 {
        match self.family() {
            Family::Helvetica => -207.0,
            Family::Times => -217.0,
            Family::Courier => -157.0,
        }
    }

    /// Advance width of `ch` in thousandths of an em, or `None` when the
    /// character has no WinAnsi code.
    pub fn char_width(self, ch: char) -> Option<f32> {
        let code = win_ansi_byte(ch)?;
        if self.family() == Family::Courier {
            return Some(600.0);
        }
        let width = match code {
            0x20..=0x7E => self.ascii_table()[(code - 0x20) as usize],
            _ => self.extended_width(code),
        };
        Some(width as f32)
    }

    fn ascii_table(self) -> &'static [u16; 95] {
        use StandardFont::*;
        match self {
            Helvetica | HelveticaOblique => &HELVETICA_WIDTHS,
            HelveticaBold | HelveticaBoldOblique => &HELVETICA_BOLD_WIDTHS,
            TimesRoman => &TIMES_ROMAN_WIDTHS,
            TimesItalic => &TIMES_ITALIC_WIDTHS,
            // Bold italic is measured with the upright bold table.
            TimesBold | TimesBoldItalic => &TIMES_BOLD_WIDTHS,
            Courier | CourierBold | CourierOblique | CourierBoldOblique => &HELVETICA_WIDTHS,
        }
    }

    fn extended_width(self, code: u8) -> u16 {
        let helvetica = self.family() == Family::Helvetica;
        match code {
            0x95 => 350,
            0x96 => {
                if helvetica {
                    556
                } else {
                    500
                }
            }
            0x97 | 0x85 | 0x89 => 1000,
            0x91 | 0x92 | 0x82 => {
                if helvetica {
                    222
                } else {
                    333
                }
            }
            0x93 | 0x94 | 0x84 => {
                if helvetica {
                    333
                } else {
                    444
                }
            }
            0xA0 => {
                if helvetica {
                    278
                } else {
                    250
                }
            }
            _ => {
                if helvetica {
                    556
                } else {
                    500
                }
            }
        }
    }
}

/// WinAnsi code for `ch`, if it has one.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encodes `text` as WinAnsi, substituting `?` for anything unencodable.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_resolution() {
        assert_eq!(
            StandardFont::from_family("Helvetica", true, false),
            Some(StandardFont::HelveticaBold)
        );
        assert_eq!(
            StandardFont::from_family("serif", false, true),
            Some(StandardFont::TimesItalic)
        );
        assert_eq!(
            StandardFont::from_family("monospace", false, false),
            Some(StandardFont::Courier)
        );
        assert_eq!(StandardFont::from_family("NotoSansCJKsc", false, false), None);
    }

    #[test]
    fn test_ascii_widths() {
        assert_eq!(StandardFont::Helvetica.char_width(' '), Some(278.0));
        assert_eq!(StandardFont::Helvetica.char_width('W'), Some(944.0));
        assert_eq!(StandardFont::HelveticaBold.char_width('a'), Some(556.0));
        assert_eq!(StandardFont::TimesRoman.char_width('m'), Some(778.0));
        assert_eq!(StandardFont::CourierBold.char_width('i'), Some(600.0));
        assert_eq!(StandardFont::Helvetica.char_width('~'), Some(584.0));
    }

    #[test]
    fn test_unencodable_characters_have_no_width() {
        assert_eq!(StandardFont::Helvetica.char_width('中'), None);
        assert_eq!(StandardFont::Helvetica.char_width('\u{2022}'), Some(350.0));
        assert_eq!(StandardFont::TimesRoman.char_width('\u{2014}'), Some(1000.0));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(to_win_ansi("a\u{2022}b"), vec![b'a', 0x95, b'b']);
        assert_eq!(to_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("\u{4e2d}"), vec![b'?']);
    }
}
