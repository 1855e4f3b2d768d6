//! A PDF writer that buffers objects and emits them once, with a classic
//! cross-reference table.

use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

pub struct StreamingPdfWriter<W: Write + Seek> {
    writer: W,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    outline_root_id: Option<ObjectId>,
    info_id: Option<ObjectId>,
    buffered_objects: BTreeMap<ObjectId, Object>,
}

impl<W: Write + Seek> StreamingPdfWriter<W> {
    /// Writes the file header and reserves the ids of the shared resource
    /// dictionary, the page tree and the catalog.
    pub fn new(mut writer: W, version: &str, resources: Dictionary) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{}\n%\u{e2}\u{e3}\u{cf}\u{d3}\n", version).as_bytes())?;

        let resources_id = (1, 0);
        let pages_id = (2, 0);
        let catalog_id = (3, 0);

        let mut buffered_objects = BTreeMap::new();
        buffered_objects.insert(resources_id, Object::Dictionary(resources));

        Ok(Self {
            writer,
            max_id: 3,
            catalog_id,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            outline_root_id: None,
            info_id: None,
            buffered_objects,
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered_objects.insert(id, object);
        id
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: Object) {
        self.max_id = self.max_id.max(id.0);
        self.buffered_objects.insert(id, object);
    }

    /// Replaces the shared resource dictionary written at `resources_id`.
    pub fn set_resources(&mut self, resources: Dictionary) {
        self.buffered_objects
            .insert(self.resources_id, Object::Dictionary(resources));
    }

    pub fn buffer_content_stream(&mut self, content: Content) -> io::Result<ObjectId> {
        let bytes = content
            .encode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        Ok(self.buffer_object(Object::Stream(Stream::new(dictionary! {}, bytes))))
    }

    pub fn set_page_ids(&mut self, page_ids: Vec<ObjectId>) {
        self.page_ids = page_ids;
    }

    pub fn set_outline_root_id(&mut self, outline_root_id: Option<ObjectId>) {
        self.outline_root_id = outline_root_id;
    }

    /// Buffers the document information dictionary referenced from the trailer.
    pub fn set_info(&mut self, info: Dictionary) {
        let id = self.buffer_object(Object::Dictionary(info));
        self.info_id = Some(id);
    }

    pub fn finish(mut self) -> io::Result<W> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict.into());

        let mut catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if let Some(outline_id) = self.outline_root_id {
            catalog_dict.set("Outlines", outline_id);
            catalog_dict.set("PageMode", "UseOutlines");
        }
        self.buffer_object_at_id(self.catalog_id, catalog_dict.into());

        let mut offsets = BTreeMap::new();
        for (id, object) in &self.buffered_objects {
            let offset = self.writer.stream_position()?;
            offsets.insert(id.0, offset);
            internal_writer::write_indirect_object(&mut self.writer, *id, object)?;
        }

        let xref_start = self.writer.stream_position()?;
        let size = self.max_id + 1;
        internal_writer::write_xref(&mut self.writer, size, &offsets)?;

        let mut trailer = dictionary! { "Size" => size as i64, "Root" => self.catalog_id };
        if let Some(info_id) = self.info_id {
            trailer.set("Info", info_id);
        }
        writeln!(self.writer, "trailer")?;
        internal_writer::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer)
    }
}

mod internal_writer {
    use super::*;
    use lopdf::StringFormat;
    use quire_render_core::utils::fmt_pt;

    pub fn write_indirect_object<W: Write>(
        writer: &mut W,
        id: ObjectId,
        object: &Object,
    ) -> io::Result<()> {
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")?;
        Ok(())
    }

    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => writer.write_all(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => write!(writer, "{}", i),
            Object::Real(r) => write!(writer, "{}", fmt_pt(*r as f32)),
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(s, StringFormat::Literal) => {
                writer.write_all(b"(")?;
                for &byte in s {
                    if matches!(byte, b'(' | b')' | b'\\') {
                        writer.write_all(b"\\")?;
                    }
                    writer.write_all(&[byte])?;
                }
                writer.write_all(b")")
            }
            Object::String(s, StringFormat::Hexadecimal) => {
                writer.write_all(b"<")?;
                for byte in s {
                    write!(writer, "{:02X}", byte)?;
                }
                writer.write_all(b">")
            }
            Object::Array(arr) => {
                writer.write_all(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, obj)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        writer.write_all(b"<<")?;
        let sorted: BTreeMap<_, _> = dict.iter().collect();
        for (key, value) in sorted {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    /// One subsection covering every id below `size`; ids never written are
    /// listed as free.
    pub fn write_xref<W: Write>(
        writer: &mut W,
        size: u32,
        offsets: &BTreeMap<u32, u64>,
    ) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", size)?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..size {
            match offsets.get(&id) {
                Some(offset) => writeln!(writer, "{:010} 00000 n ", offset)?,
                None => writeln!(writer, "0000000000 00000 f ")?,
            }
        }
        Ok(())
    }
}
