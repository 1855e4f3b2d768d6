use crate::fonts::FontResources;
use crate::helpers::{self, PageContext, text_string};
use crate::writer::StreamingPdfWriter;
use lopdf::{Object, ObjectId, dictionary};
use quire_layout::{FontLibrary, LaidOutDocument};
use quire_render_core::{DocumentRenderer, RenderError};
use std::io::{Cursor, Seek, Write};

const PDF_VERSION: &str = "1.7";
const PRODUCER: &str = "quire";

/// Serializes laid-out documents to PDF with `lopdf` objects and a
/// streaming writer. Text drawn with the embedded face pulls the font file
/// from `fonts` into the output.
#[derive(Debug, Clone, Copy)]
pub struct LopdfRenderer<'a> {
    fonts: &'a FontLibrary,
}

impl<'a> LopdfRenderer<'a> {
    pub fn new(fonts: &'a FontLibrary) -> Self {
        Self { fonts }
    }

    /// Writes `document` to `out` and returns the writer once the trailer
    /// is flushed.
    pub fn write_document<W: Write + Seek>(
        &self,
        document: &LaidOutDocument,
        out: W,
    ) -> Result<W, RenderError> {
        let page_width = document.geometry.page_width();
        let page_height = document.geometry.page_height();
        if !(page_width > 0.0 && page_height > 0.0) {
            return Err(RenderError::Pdf(format!(
                "page size {}x{} is not drawable",
                page_width, page_height
            )));
        }

        let mut writer = StreamingPdfWriter::new(out, PDF_VERSION, lopdf::Dictionary::new())?;
        let mut fonts = FontResources::new(self.fonts);
        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(document.pages.len());

        for page in &document.pages {
            let mut ctx = PageContext::new(page_height, &mut fonts);
            for element in &page.elements {
                ctx.draw_element(element)?;
            }
            let content_id = writer.buffer_content_stream(ctx.finish())?;
            let page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => writer.resources_id,
            };
            page_ids.push(writer.buffer_object(page_dict.into()));
        }

        let font_dict = fonts.write_fonts(&mut writer);
        writer.set_resources(dictionary! { "Font" => font_dict });

        let outline_root =
            helpers::build_outlines(&mut writer, &document.outline, &page_ids, page_height);
        writer.set_outline_root_id(outline_root);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(
                chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        };
        if let Some(title) = document.title.as_deref().filter(|t| !t.trim().is_empty()) {
            info.set("Title", text_string(title));
        }
        writer.set_info(info);

        log::debug!(
            "Serializing {} page(s), {} outline entries",
            page_ids.len(),
            document.outline.len()
        );
        writer.set_page_ids(page_ids);
        Ok(writer.finish()?)
    }
}

impl DocumentRenderer for LopdfRenderer<'_> {
    fn render_document(&self, document: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
        let bytes = self
            .write_document(document, Cursor::new(Vec::new()))?
            .into_inner();
        log::debug!("Rendered PDF of {} bytes", bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Dictionary;
    use quire_layout::{
        FaceKey, FontConfig, LaidOutPage, LayoutElement, OutlineEntry, PageFlow,
        PositionedElement, StandardFont, StyledSpan, TextRun, TextStyle, WrapOptions,
        layout_text,
    };
    use quire_style::{Color, PageGeometry, TextAlign};
    use std::path::PathBuf;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn text(content: &str, y: f32) -> PositionedElement {
        PositionedElement {
            x: 56.0,
            y,
            width: 100.0,
            height: 14.0,
            element: LayoutElement::Text(TextRun {
                content: content.to_string(),
                face: FaceKey::Standard(StandardFont::Helvetica),
                size: 11.0,
                color: Color::BLACK,
                synthetic_bold: false,
                baseline: 10.5,
            }),
        }
    }

    /// A TrueType font with Greek coverage, DejaVu Sans first.
    fn greek_system_font() -> Option<PathBuf> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let mut paths: Vec<PathBuf> = db
            .faces()
            .filter_map(|face| match &face.source {
                fontdb::Source::File(path)
                    if path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf")) =>
                {
                    Some(path.clone())
                }
                _ => None,
            })
            .collect();
        paths.sort_by_key(|path| !path.ends_with("DejaVuSans.ttf"));
        paths.into_iter().find(|path| {
            let config = FontConfig {
                font_path: Some(path.clone()),
                probe_assets: false,
                register_as: "ReportFont".to_string(),
            };
            FontLibrary::load(&config)
                .embedded()
                .is_some_and(|font| !font.is_cff() && font.glyph('\u{3bb}').is_some())
        })
    }

    fn font_dicts_with_subtype<'d>(
        doc: &'d lopdf::Document,
        subtype: &[u8],
    ) -> Vec<&'d Dictionary> {
        doc.objects
            .values()
            .filter_map(|object| object.as_dict().ok())
            .filter(|dict| {
                dict.get(b"Subtype")
                    .and_then(|name| name.as_name())
                    .is_ok_and(|name| name == subtype)
            })
            .collect()
    }

    fn document(pages: Vec<Vec<PositionedElement>>) -> LaidOutDocument {
        LaidOutDocument {
            geometry: PageGeometry::default(),
            pages: pages
                .into_iter()
                .map(|elements| LaidOutPage { elements })
                .collect(),
            outline: Vec::new(),
            title: Some("Quarterly".to_string()),
        }
    }

    #[test]
    fn test_renders_loadable_pdf() {
        init_logger();
        let library = FontLibrary::builtin();
        let doc = document(vec![vec![text("Hello", 56.0)], vec![text("World", 56.0)]]);
        let bytes = LopdfRenderer::new(&library).render_document(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let loaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
        let first = loaded.extract_text(&[1]).unwrap();
        assert!(first.contains("Hello"));
    }

    #[test]
    fn test_empty_page_is_still_a_page() {
        let library = FontLibrary::builtin();
        let bytes = LopdfRenderer::new(&library)
            .render_document(&document(vec![vec![]]))
            .unwrap();
        let loaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_info_and_outline_are_written() {
        let library = FontLibrary::builtin();
        let mut doc = document(vec![vec![text("Intro", 56.0)]]);
        doc.outline.push(OutlineEntry {
            level: 1,
            title: "Intro".to_string(),
            page_index: 0,
            y: 56.0,
        });
        let bytes = LopdfRenderer::new(&library).render_document(&doc).unwrap();
        let loaded = lopdf::Document::load_mem(&bytes).unwrap();

        let info_id = loaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = loaded.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Quarterly");

        let root_id = loaded.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let catalog = loaded.get_dictionary(root_id).unwrap();
        assert!(catalog.get(b"Outlines").is_ok());
    }

    #[test]
    fn test_bold_faces_get_their_own_font_resource() {
        let library = FontLibrary::builtin();
        let mut bold = text("Bold", 80.0);
        if let LayoutElement::Text(run) = &mut bold.element {
            run.face = FaceKey::Standard(StandardFont::HelveticaBold);
        }
        let doc = document(vec![vec![text("Plain", 56.0), bold]]);
        let bytes = LopdfRenderer::new(&library).render_document(&doc).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_embedded_font_is_written_as_type0() {
        init_logger();
        let Some(path) = greek_system_font() else {
            eprintln!("no system TrueType font with Greek glyphs; skipping");
            return;
        };
        let library = FontLibrary::load(&FontConfig {
            font_path: Some(path),
            probe_assets: false,
            register_as: "ReportFont".to_string(),
        });
        let family = library.family();
        assert_eq!(family, "ReportFont");

        let style = TextStyle::new(family, 11.0);
        let spans = vec![
            StyledSpan::new("\u{3b1}\u{3bb}\u{3c6}\u{3b1} and ", style.clone()),
            StyledSpan::new("\u{3b2}\u{3ae}\u{3c4}\u{3b1}", style.bold(true)),
        ];
        let options = WrapOptions {
            max_width: 400.0,
            align: TextAlign::Left,
            leading: 14.0,
            preserve_spaces: false,
        };
        let lines = layout_text(&library, &spans, &options);
        let mut flow = PageFlow::new(PageGeometry::default()).unwrap();
        flow.push_paragraph(&lines, 0.0, 0.0);
        let bytes = LopdfRenderer::new(&library)
            .render_document(&flow.finish())
            .unwrap();
        let loaded = lopdf::Document::load_mem(&bytes).unwrap();

        let type0 = font_dicts_with_subtype(&loaded, b"Type0");
        assert_eq!(type0.len(), 1);
        let font = type0[0];
        assert_eq!(font.get(b"Encoding").unwrap().as_name().unwrap(), b"Identity-H");
        assert!(font.get(b"ToUnicode").unwrap().as_reference().is_ok());

        let descendants = font.get(b"DescendantFonts").unwrap().as_array().unwrap();
        let cid_id = descendants[0].as_reference().unwrap();
        let cid_font = loaded.get_dictionary(cid_id).unwrap();
        assert_eq!(cid_font.get(b"Subtype").unwrap().as_name().unwrap(), b"CIDFontType2");
        let descriptor_id = cid_font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
        let descriptor = loaded.get_dictionary(descriptor_id).unwrap();
        let file_id = descriptor.get(b"FontFile2").unwrap().as_reference().unwrap();
        assert!(loaded.get_object(file_id).unwrap().as_stream().is_ok());

        let page_id = *loaded.get_pages().get(&1).unwrap();
        let content = loaded.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("2 Tr"));
    }

    #[test]
    fn test_zero_sized_page_is_rejected() {
        let library = FontLibrary::builtin();
        let mut doc = document(vec![vec![]]);
        doc.geometry.size = quire_style::PageSize::Custom {
            width: 0.0,
            height: 0.0,
        };
        assert!(matches!(
            LopdfRenderer::new(&library).render_document(&doc),
            Err(RenderError::Pdf(_))
        ));
    }
}
