//! Font configuration for pixmap surfaces.
//!
//! A [`FontConfig`] is plain data. Resolving it scans directories and system fonts
//! once; the [`ResolvedFontConfig`] is then cloned into every surface so throwaway
//! measurement canvases never rescan the filesystem.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Families a score needs: the SMuFL music font and the text font drawn beside it.
pub const ENGRAVING_FAMILIES: &[&str] = &["Bravura", "Academico"];

#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files held in memory (SMuFL music fonts are usually shipped this way).
    pub custom_fonts: Vec<CustomFont>,
    /// Mappings from generic CSS family names to concrete font family names.
    pub generic_families: GenericFamilyMap,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Whether glyph outlines are hinted (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

impl FontConfig {
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    pub fn with_custom_font(mut self, data: Vec<u8>) -> Self {
        self.custom_fonts.push(CustomFont {
            data: Arc::new(data),
        });
        self
    }

    pub fn with_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    pub fn with_hinting(mut self, enabled: bool) -> Self {
        self.hinting_enabled = enabled;
        self
    }

    /// Resolve this configuration into a concrete font database.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// Raw font file data (TTF/OTF). Arc-wrapped for cheap cloning.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

/// Concrete families for the CSS generic names, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    /// Text fonts the engraving library pairs with its music fonts come first.
    pub fn defaults() -> Self {
        Self {
            serif: vec![
                "Academico".into(),
                "EB Garamond".into(),
                "Times New Roman".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            sans_serif: vec![
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "DejaVu Sans".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

/// A [`FontConfig`] resolved into a font database.
///
/// Cloning shares the scanned database; each surface copies it into its own
/// font system on creation.
#[derive(Clone)]
pub struct ResolvedFontConfig {
    pub(crate) fontdb: Arc<fontdb::Database>,
    pub(crate) hinting_enabled: bool,
}

impl ResolvedFontConfig {
    pub fn new(config: &FontConfig) -> Self {
        let fontdb = build_font_database(config);
        log::debug!(
            target: "canvas",
            "resolved font config: {} faces",
            fontdb.faces().count()
        );
        Self {
            fontdb: Arc::new(fontdb),
            hinting_enabled: config.hinting_enabled,
        }
    }

    /// Number of font faces available.
    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Whether any face declares `family` as one of its names.
    pub fn has_family(&self, family: &str) -> bool {
        self.fontdb
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    }

    /// The entries of `families` no loaded face provides.
    pub fn missing_families<'a>(&self, families: &[&'a str]) -> Vec<&'a str> {
        families
            .iter()
            .copied()
            .filter(|family| !self.has_family(family))
            .collect()
    }
}

impl std::fmt::Debug for ResolvedFontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFontConfig")
            .field("faces", &self.face_count())
            .field("hinting_enabled", &self.hinting_enabled)
            .finish()
    }
}

/// Load every source named by `config` into one database.
fn build_font_database(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    if config.load_system_fonts {
        db.load_system_fonts();
    }

    for dir in &config.font_dirs {
        if !dir.is_dir() {
            log::warn!(target: "canvas", "font directory {} does not exist", dir.display());
        }
        db.load_fonts_dir(dir);
    }

    for font in &config.custom_fonts {
        db.load_font_data(Vec::from(font.data.as_slice()));
    }

    assign_generic_families(&mut db, &config.generic_families);

    db
}

/// Point each generic name at the first installed family on its list.
fn assign_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let installed: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let pick = |list: &[String]| list.iter().find(|name| installed.contains(*name)).cloned();

    if let Some(family) = pick(&families.serif) {
        db.set_serif_family(family);
    }
    if let Some(family) = pick(&families.sans_serif) {
        db.set_sans_serif_family(family);
    }
    if let Some(family) = pick(&families.monospace) {
        db.set_monospace_family(family);
    }
}
