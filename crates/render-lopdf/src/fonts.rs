//! Font resources for one document: standard fonts by reference, the
//! registered font embedded as a CID-keyed composite font.

use crate::writer::StreamingPdfWriter;
use lopdf::{Dictionary, Object, Stream, StringFormat, dictionary};
use quire_layout::metrics::to_win_ansi;
use quire_layout::{EmbeddedFont, FaceKey, FontLibrary, StandardFont};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{Seek, Write};

/// Unicode mappings per `beginbfchar` block; the CMap format caps it at 100.
const BFCHAR_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy)]
struct UsedGlyph {
    width: f32,
    ch: char,
}

/// Collects the faces a document draws with and the embedded glyphs it uses.
pub struct FontResources<'a> {
    library: &'a FontLibrary,
    faces: Vec<FaceKey>,
    used_glyphs: BTreeMap<u16, UsedGlyph>,
}

impl<'a> FontResources<'a> {
    pub fn new(library: &'a FontLibrary) -> Self {
        Self {
            library,
            faces: Vec::new(),
            used_glyphs: BTreeMap::new(),
        }
    }

    /// The face actually drawn for `face`. The embedded key degrades to
    /// Helvetica when the library has no font file.
    fn effective(&self, face: FaceKey) -> FaceKey {
        match face {
            FaceKey::Embedded if self.library.embedded().is_none() => {
                FaceKey::Standard(StandardFont::Helvetica)
            }
            other => other,
        }
    }

    /// Resource name of `face`, registering it on first use.
    pub fn resource_name(&mut self, face: FaceKey) -> Vec<u8> {
        let face = self.effective(face);
        let index = match self.faces.iter().position(|f| *f == face) {
            Some(index) => index,
            None => {
                self.faces.push(face);
                self.faces.len() - 1
            }
        };
        format!("F{}", index + 1).into_bytes()
    }

    /// Encodes `text` as a string operand for `face`. Embedded text is drawn
    /// with two-byte codes; every code used is remembered for the width and
    /// Unicode tables.
    pub fn encode(&mut self, face: FaceKey, text: &str) -> Object {
        match (self.effective(face), self.library.embedded()) {
            (FaceKey::Embedded, Some(font)) => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let code = match font.glyph(ch) {
                        Some(glyph) => {
                            let code = if font.is_cff() { glyph.cid } else { glyph.id };
                            self.used_glyphs.entry(code).or_insert(UsedGlyph {
                                width: font.glyph_width(glyph),
                                ch,
                            });
                            code
                        }
                        None => 0,
                    };
                    bytes.extend_from_slice(&code.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
            _ => Object::String(to_win_ansi(text), StringFormat::Literal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Buffers the font objects and returns the `/Font` resource dictionary.
    pub fn write_fonts<W: Write + Seek>(self, writer: &mut StreamingPdfWriter<W>) -> Dictionary {
        let mut fonts = Dictionary::new();
        for (index, face) in self.faces.iter().enumerate() {
            let name = format!("F{}", index + 1);
            let font_ref = match (face, self.library.embedded()) {
                (FaceKey::Standard(font), _) => writer.buffer_object(standard_font(*font).into()),
                (FaceKey::Embedded, Some(font)) => {
                    write_embedded_font(writer, font, &self.used_glyphs)
                }
                (FaceKey::Embedded, None) => {
                    writer.buffer_object(standard_font(StandardFont::Helvetica).into())
                }
            };
            fonts.set(name, font_ref);
        }
        log::debug!(
            "Wrote {} font resource(s), {} embedded glyph(s)",
            self.faces.len(),
            self.used_glyphs.len()
        );
        fonts
    }
}

fn standard_font(font: StandardFont) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.postscript_name(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn write_embedded_font<W: Write + Seek>(
    writer: &mut StreamingPdfWriter<W>,
    font: &EmbeddedFont,
    used: &BTreeMap<u16, UsedGlyph>,
) -> lopdf::ObjectId {
    let data: Vec<u8> = font.data().as_ref().clone();
    let data_len = data.len() as i64;
    let (file_key, file_stream) = if font.is_cff() {
        (
            "FontFile3",
            Stream::new(dictionary! { "Subtype" => "OpenType" }, data),
        )
    } else {
        (
            "FontFile2",
            Stream::new(dictionary! { "Length1" => data_len }, data),
        )
    };
    let file_id = writer.buffer_object(Object::Stream(file_stream));

    let bbox: Vec<Object> = font.bbox().iter().map(|v| v.round().into()).collect();
    let mut descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.postscript_name(),
        "Flags" => 4,
        "FontBBox" => bbox,
        "ItalicAngle" => 0,
        "Ascent" => font.ascent().round() as i64,
        "Descent" => font.descent().round() as i64,
        "CapHeight" => font.cap_height().round() as i64,
        "StemV" => 80,
    };
    descriptor.set(file_key, file_id);
    let descriptor_id = writer.buffer_object(descriptor.into());

    let mut widths = Vec::with_capacity(used.len() * 2);
    for (code, glyph) in used {
        widths.push(Object::Integer(*code as i64));
        widths.push(Object::Array(vec![Object::Integer(glyph.width.round() as i64)]));
    }

    let mut cid_font = dictionary! {
        "Type" => "Font",
        "Subtype" => if font.is_cff() { "CIDFontType0" } else { "CIDFontType2" },
        "BaseFont" => font.postscript_name(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
    };
    if !font.is_cff() {
        cid_font.set("CIDToGIDMap", "Identity");
    }
    let cid_font_id = writer.buffer_object(cid_font.into());

    let to_unicode = Stream::new(dictionary! {}, to_unicode_cmap(used).into_bytes());
    let to_unicode_id = writer.buffer_object(Object::Stream(to_unicode));

    writer.buffer_object(
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => font.postscript_name(),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }
        .into(),
    )
}

/// A CMap mapping every used two-byte code back to its character, so text
/// drawn with the embedded font can be extracted and searched.
fn to_unicode_cmap(used: &BTreeMap<u16, UsedGlyph>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    let entries: Vec<_> = used.iter().collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (code, glyph) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = glyph
                .ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", code, utf16);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
