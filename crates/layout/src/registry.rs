//! Resolution of the report style set from the process font library.

use crate::fonts::FontLibrary;
use quire_style::StyleSet;
use std::sync::{Arc, OnceLock};

static RESOLVED: OnceLock<Arc<StyleSet>> = OnceLock::new();

/// Entry point for the report styles every renderer shares.
pub struct StyleRegistry;

impl StyleRegistry {
    /// The style set for the process font library, built on first call and
    /// shared afterwards. Never fails: a missing font already degraded to the
    /// built-in family when the library was initialized.
    pub fn resolve() -> Arc<StyleSet> {
        RESOLVED
            .get_or_init(|| {
                let family = FontLibrary::global().family();
                log::debug!("Resolved report styles for font family '{}'", family);
                Arc::new(StyleSet::for_font(family))
            })
            .clone()
    }

    /// Styles for an explicitly constructed library, bypassing the cache.
    pub fn resolve_with(library: &FontLibrary) -> StyleSet {
        StyleSet::for_font(library.family())
    }

    /// The family name the process resolved to.
    pub fn resolved_font_name() -> String {
        Self::resolve().font_name().to_string()
    }
}
