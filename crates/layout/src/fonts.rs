//! Process-wide font library.
//!
//! Reports prefer one CJK-capable font file shipped next to the application.
//! If it is present and parses, it is registered under [`CJK_FONT_NAME`] and
//! every style uses it; otherwise the library silently degrades to the
//! built-in Helvetica family.
//!
//! ## Initialization order
//!
//! The library is a lazily initialized singleton. The first call to either
//! [`FontLibrary::install`] or [`FontLibrary::global`] probes the font file
//! exactly once; concurrent first callers block until that probe finishes and
//! then all observe the same library. `install` only takes effect if it wins
//! that race, so callers that want a custom font path must install it before
//! the first render.

use crate::metrics::{StandardFont, win_ansi_byte};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Name the preferred CJK font is registered under.
pub const CJK_FONT_NAME: &str = "NotoSansCJKsc";
/// File name probed in the asset directories.
pub const CJK_FONT_FILE: &str = "NotoSansCJKsc-Regular.otf";
/// Family used when no font file could be registered.
pub const DEFAULT_FONT_NAME: &str = "Helvetica";

static LIBRARY: OnceLock<FontLibrary> = OnceLock::new();

#[derive(Error, Debug)]
pub enum FontLoadError {
    #[error("I/O error reading font: {0}")]
    Io(#[from] std::io::Error),
    #[error("Font data contains no usable face")]
    NoFace,
    #[error("Failed to parse font: {0}")]
    Parse(String),
}

/// Where to look for the preferred font.
#[derive(Debug, Clone)]
pub struct FontConfig {
    /// An explicit font file. When unset, the asset directories are probed.
    pub font_path: Option<PathBuf>,
    /// Probe `assets/fonts/` relative to the working directory and its parents.
    pub probe_assets: bool,
    /// Name the loaded font is registered under.
    pub register_as: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            probe_assets: true,
            register_as: CJK_FONT_NAME.to_string(),
        }
    }
}

impl FontConfig {
    pub fn with_font_path(path: impl Into<PathBuf>) -> Self {
        Self {
            font_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A configuration that never touches the filesystem.
    pub fn builtin_only() -> Self {
        Self {
            font_path: None,
            probe_assets: false,
            ..Self::default()
        }
    }

    fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.font_path {
            return vec![path.clone()];
        }
        if !self.probe_assets {
            return Vec::new();
        }
        // Supports running from the workspace root and from nested crate directories.
        ["assets/fonts", "../assets/fonts", "../../assets/fonts"]
            .iter()
            .map(|dir| Path::new(dir).join(CJK_FONT_FILE))
            .collect()
    }
}

/// One glyph of the embedded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    /// Character identifier used in content streams. Equals `id` unless the
    /// font is a CID-keyed CFF font.
    pub cid: u16,
    /// Horizontal advance in font units.
    pub advance: u16,
}

/// A TrueType/OpenType font read from disk and registered for embedding.
pub struct EmbeddedFont {
    name: String,
    postscript_name: String,
    family_name: String,
    path: PathBuf,
    data: Arc<Vec<u8>>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    bbox: [i16; 4],
    is_cff: bool,
    glyphs: HashMap<char, Glyph>,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("name", &self.name)
            .field("postscript_name", &self.postscript_name)
            .field("path", &self.path)
            .field("data_len", &self.data.len())
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl EmbeddedFont {
    /// Reads `path`, registers it with fontdb to learn its names, and parses
    /// its metrics and character map.
    pub fn load(path: &Path, name: &str) -> Result<Self, FontLoadError> {
        let data = std::fs::read(path)?;
        log::debug!("Loading font {} ({} bytes)", path.display(), data.len());

        let mut db = fontdb::Database::new();
        db.load_font_data(data.clone());
        let (postscript_name, family_name, index) = {
            let face_info = db.faces().last().ok_or(FontLoadError::NoFace)?;
            let family = face_info
                .families
                .first()
                .map(|(family, _)| family.clone())
                .unwrap_or_else(|| name.to_string());
            (face_info.post_script_name.clone(), family, face_info.index)
        };

        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| FontLoadError::Parse(e.to_string()))?;
        let glyphs = collect_glyphs(&face);
        if glyphs.is_empty() {
            return Err(FontLoadError::Parse(
                "font has no Unicode character map".to_string(),
            ));
        }

        let bounds = face.global_bounding_box();
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascender);
        let is_cff = face.tables().cff.is_some();

        let font = Self {
            name: name.to_string(),
            postscript_name: sanitize_postscript_name(&postscript_name, name),
            family_name,
            path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
            data: Arc::new(data),
            units_per_em,
            ascender,
            descender,
            cap_height,
            bbox: [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
            is_cff,
            glyphs,
        };
        log::debug!(
            "Font metadata: family='{}', ps_name='{}', {} mapped characters, cff={}",
            font.family_name,
            font.postscript_name,
            font.glyphs.len(),
            font.is_cff
        );
        Ok(font)
    }

    /// The name styles refer to this font by.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Absolute location of the font file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    pub fn is_cff(&self) -> bool {
        self.is_cff
    }

    /// Font bounding box in thousandths of an em.
    pub fn bbox(&self) -> [f32; 4] {
        self.bbox.map(|v| self.scale(v as f32))
    }

    pub fn ascent(&self) -> f32 {
        self.scale(self.ascender as f32)
    }

    pub fn descent(&self) -> f32 {
        self.scale(self.descender as f32)
    }

    pub fn cap_height(&self) -> f32 {
        self.scale(self.cap_height as f32)
    }

    /// True when `family` refers to this font.
    pub fn answers_to(&self, family: &str) -> bool {
        family.eq_ignore_ascii_case(&self.name)
            || family.eq_ignore_ascii_case(&self.family_name)
            || family.eq_ignore_ascii_case(&self.postscript_name)
    }

    pub fn glyph(&self, ch: char) -> Option<Glyph> {
        self.glyphs.get(&ch).copied()
    }

    /// Advance of `ch` in thousandths of an em.
    pub fn advance(&self, ch: char) -> Option<f32> {
        self.glyph(ch).map(|g| self.glyph_width(g))
    }

    pub fn glyph_width(&self, glyph: Glyph) -> f32 {
        self.scale(glyph.advance as f32)
    }

    fn scale(&self, units: f32) -> f32 {
        units * 1000.0 / self.units_per_em.max(1) as f32
    }
}

fn collect_glyphs(face: &ttf_parser::Face<'_>) -> HashMap<char, Glyph> {
    let mut glyphs = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return glyphs;
    };
    let cff = face.tables().cff.as_ref();
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }
        subtable.codepoints(|code_point| {
            let Some(ch) = char::from_u32(code_point) else {
                return;
            };
            if glyphs.contains_key(&ch) {
                return;
            }
            if let Some(gid) = subtable.glyph_index(code_point) {
                let cid = cff
                    .and_then(|table| table.glyph_cid(gid))
                    .unwrap_or(gid.0);
                glyphs.insert(
                    ch,
                    Glyph {
                        id: gid.0,
                        cid,
                        advance: face.glyph_hor_advance(gid).unwrap_or(0),
                    },
                );
            }
        });
    }
    glyphs
}

/// PDF names cannot contain spaces or delimiters.
fn sanitize_postscript_name(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// A face text can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKey {
    Standard(StandardFont),
    /// The library's registered font file.
    Embedded,
}

impl FaceKey {
    pub fn is_embedded(self) -> bool {
        matches!(self, FaceKey::Embedded)
    }
}

/// Font selection and measurement for every render in the process.
#[derive(Debug)]
pub struct FontLibrary {
    embedded: Option<EmbeddedFont>,
    family: String,
}

impl FontLibrary {
    /// Installs the process library from `config`.
    ///
    /// Returns `Err` with the already-initialized library if another caller
    /// got there first; the configuration is then ignored.
    pub fn install(config: FontConfig) -> Result<&'static FontLibrary, &'static FontLibrary> {
        let mut installed = false;
        let library = LIBRARY.get_or_init(|| {
            installed = true;
            FontLibrary::load(&config)
        });
        if installed {
            Ok(library)
        } else {
            log::debug!(
                "Font library already initialized with '{}'; ignoring install",
                library.family
            );
            Err(library)
        }
    }

    /// The process library, probing the default font location on first use.
    pub fn global() -> &'static FontLibrary {
        LIBRARY.get_or_init(|| FontLibrary::load(&FontConfig::default()))
    }

    /// Builds a library from `config`. Never fails: any problem with the font
    /// file degrades to the built-in family.
    pub fn load(config: &FontConfig) -> Self {
        for candidate in config.candidates() {
            if !candidate.is_file() {
                log::debug!("Font candidate {} not found", candidate.display());
                continue;
            }
            match EmbeddedFont::load(&candidate, &config.register_as) {
                Ok(font) => {
                    log::info!(
                        "Registered font '{}' from {}",
                        font.name(),
                        font.path().display()
                    );
                    return Self {
                        family: font.name().to_string(),
                        embedded: Some(font),
                    };
                }
                Err(e) => {
                    log::warn!(
                        "Failed to register font {}: {}. Falling back to {}.",
                        candidate.display(),
                        e,
                        DEFAULT_FONT_NAME
                    );
                    break;
                }
            }
        }
        log::info!("Using built-in font '{}'", DEFAULT_FONT_NAME);
        Self::builtin()
    }

    /// A library with only the standard fonts.
    pub fn builtin() -> Self {
        Self {
            embedded: None,
            family: DEFAULT_FONT_NAME.to_string(),
        }
    }

    /// The family every report style uses.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn embedded(&self) -> Option<&EmbeddedFont> {
        self.embedded.as_ref()
    }

    /// Chooses the face that draws `ch` for the requested family and style,
    /// and the character to draw (`?` when no face can encode it).
    pub fn face_for(&self, family: &str, bold: bool, italic: bool, ch: char) -> (FaceKey, char) {
        let fallback = StandardFont::Helvetica.with_style(bold, italic);

        if let Some(font) = self.embedded.as_ref().filter(|f| f.answers_to(family)) {
            if font.glyph(ch).is_some() {
                return (FaceKey::Embedded, ch);
            }
            if win_ansi_byte(ch).is_some() {
                return (FaceKey::Standard(fallback), ch);
            }
            log::debug!("No glyph for {:?} in '{}'; drawing '?'", ch, font.name());
            return (FaceKey::Standard(fallback), '?');
        }

        let standard = StandardFont::from_family(family, bold, italic).unwrap_or(fallback);
        if win_ansi_byte(ch).is_some() {
            return (FaceKey::Standard(standard), ch);
        }
        if let Some(font) = &self.embedded
            && font.glyph(ch).is_some()
        {
            return (FaceKey::Embedded, ch);
        }
        log::debug!(
            "Character {:?} is not encodable in {}; drawing '?'",
            ch,
            standard.postscript_name()
        );
        (FaceKey::Standard(standard), '?')
    }

    /// Advance of `ch` in `face`, in thousandths of an em.
    pub fn advance(&self, face: FaceKey, ch: char) -> f32 {
        match face {
            FaceKey::Standard(font) => font
                .char_width(ch)
                .or_else(|| font.char_width('?'))
                .unwrap_or(500.0),
            FaceKey::Embedded => self
                .embedded
                .as_ref()
                .and_then(|font| font.advance(ch))
                .unwrap_or(500.0),
        }
    }

    pub fn ascent(&self, face: FaceKey) -> f32 {
        match (face, &self.embedded) {
            (FaceKey::Standard(font), _) => font.ascent(),
            (FaceKey::Embedded, Some(font)) => font.ascent(),
            (FaceKey::Embedded, None) => StandardFont::Helvetica.ascent(),
        }
    }

    pub fn descent(&self, face: FaceKey) -> f32 {
        match (face, &self.embedded) {
            (FaceKey::Standard(font), _) => font.descent(),
            (FaceKey::Embedded, Some(font)) => font.descent(),
            (FaceKey::Embedded, None) => StandardFont::Helvetica.descent(),
        }
    }

    /// Width of `text` in points, with per-character face fallback.
    pub fn measure(&self, text: &str, family: &str, bold: bool, italic: bool, size: f32) -> f32 {
        text.chars()
            .map(|ch| {
                let (face, drawn) = self.face_for(family, bold, italic, ch);
                self.advance(face, drawn)
            })
            .sum::<f32>()
            * size
            / 1000.0
    }
}
