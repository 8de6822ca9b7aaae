// ==========================================
// Price list generator - font handling
// ==========================================
// Responsibility: load the DejaVu faces used by the document and expose
// text-width measurement for column sizing. Measurement must agree with
// what the PDF renderer embeds, so widths come from the same TTF files.
// ==========================================

use printpdf::BuiltinFont;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use ttf_parser::Face;

/// Points to millimeters.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

pub const REGULAR_FONT_FILE: &str = "DejaVuSans.ttf";
pub const BOLD_FONT_FILE: &str = "DejaVuSans-Bold.ttf";
pub const ITALIC_FONT_FILE: &str = "DejaVuSans-Oblique.ttf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// Where a face comes from when registered with a document.
#[derive(Debug, Clone)]
pub enum FontSource {
    External(PathBuf),
    Builtin(BuiltinFont),
}

// ==========================================
// FontMetrics - advance widths for one face
// ==========================================

/// Precomputed advance widths covering ASCII, Latin-1 and Latin
/// Extended-A. Characters outside the table fall back to a default
/// advance, which slightly overestimates rather than clips.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    units_per_em: f64,
    advances: HashMap<char, f64>,
    default_advance: f64,
}

impl FontMetrics {
    pub fn from_ttf_bytes(data: &[u8]) -> Option<Self> {
        let face = Face::parse(data, 0).ok()?;
        let units_per_em = f64::from(face.units_per_em());

        let mut advances = HashMap::new();
        let ranges = [(0x20u32, 0x7Fu32), (0xA0, 0x100), (0x100, 0x180)];
        for (start, end) in ranges {
            for code_point in start..end {
                let Some(c) = char::from_u32(code_point) else {
                    continue;
                };
                if let Some(advance) = face
                    .glyph_index(c)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                {
                    advances.insert(c, f64::from(advance));
                }
            }
        }

        let default_advance = advances
            .get(&'?')
            .copied()
            .unwrap_or(units_per_em / 2.0);
        Some(Self {
            units_per_em,
            advances,
            default_advance,
        })
    }

    /// Classic Helvetica widths (1000-unit em), used when no font file
    /// is available. Close enough to the bold face for layout purposes.
    pub fn helvetica() -> Self {
        let widths: [(char, f64); 95] = [
            (' ', 278.0),
            ('!', 278.0),
            ('"', 355.0),
            ('#', 556.0),
            ('$', 556.0),
            ('%', 889.0),
            ('&', 667.0),
            ('\'', 191.0),
            ('(', 333.0),
            (')', 333.0),
            ('*', 389.0),
            ('+', 584.0),
            (',', 278.0),
            ('-', 333.0),
            ('.', 278.0),
            ('/', 278.0),
            ('0', 556.0),
            ('1', 556.0),
            ('2', 556.0),
            ('3', 556.0),
            ('4', 556.0),
            ('5', 556.0),
            ('6', 556.0),
            ('7', 556.0),
            ('8', 556.0),
            ('9', 556.0),
            (':', 278.0),
            (';', 278.0),
            ('<', 584.0),
            ('=', 584.0),
            ('>', 584.0),
            ('?', 556.0),
            ('@', 1015.0),
            ('A', 667.0),
            ('B', 667.0),
            ('C', 722.0),
            ('D', 722.0),
            ('E', 667.0),
            ('F', 611.0),
            ('G', 778.0),
            ('H', 722.0),
            ('I', 278.0),
            ('J', 500.0),
            ('K', 667.0),
            ('L', 556.0),
            ('M', 833.0),
            ('N', 722.0),
            ('O', 778.0),
            ('P', 667.0),
            ('Q', 778.0),
            ('R', 722.0),
            ('S', 667.0),
            ('T', 611.0),
            ('U', 722.0),
            ('V', 667.0),
            ('W', 944.0),
            ('X', 667.0),
            ('Y', 667.0),
            ('Z', 611.0),
            ('[', 278.0),
            ('\\', 278.0),
            (']', 278.0),
            ('^', 469.0),
            ('_', 556.0),
            ('`', 333.0),
            ('a', 556.0),
            ('b', 556.0),
            ('c', 500.0),
            ('d', 556.0),
            ('e', 556.0),
            ('f', 278.0),
            ('g', 556.0),
            ('h', 556.0),
            ('i', 222.0),
            ('j', 222.0),
            ('k', 500.0),
            ('l', 222.0),
            ('m', 833.0),
            ('n', 556.0),
            ('o', 556.0),
            ('p', 556.0),
            ('q', 556.0),
            ('r', 333.0),
            ('s', 500.0),
            ('t', 278.0),
            ('u', 556.0),
            ('v', 500.0),
            ('w', 722.0),
            ('x', 500.0),
            ('y', 500.0),
            ('z', 500.0),
            ('{', 334.0),
            ('|', 260.0),
            ('}', 334.0),
            ('~', 584.0),
        ];
        Self {
            units_per_em: 1000.0,
            advances: widths.into_iter().collect(),
            default_advance: 556.0,
        }
    }

    /// Rendered width of a string in millimeters at the given size.
    pub fn text_width_mm(&self, text: &str, font_size_pt: f64) -> f64 {
        let units: f64 = text
            .chars()
            .map(|c| self.advances.get(&c).copied().unwrap_or(self.default_advance))
            .sum();
        units / self.units_per_em * font_size_pt * PT_TO_MM
    }
}

// ==========================================
// FontFamily - the document's three faces
// ==========================================

#[derive(Debug, Clone)]
pub struct FontVariant {
    pub source: FontSource,
    pub metrics: FontMetrics,
}

/// Regular, bold and italic faces resolved once per run.
#[derive(Debug, Clone)]
pub struct FontFamily {
    regular: FontVariant,
    bold: FontVariant,
    italic: FontVariant,
}

impl FontFamily {
    /// Loads the DejaVu faces from the font directory. A missing or
    /// unreadable file degrades that style to the builtin Helvetica
    /// face with approximate metrics.
    pub fn load(fonts_dir: &Path) -> Self {
        Self {
            regular: Self::load_variant(
                fonts_dir.join(REGULAR_FONT_FILE),
                BuiltinFont::Helvetica,
            ),
            bold: Self::load_variant(
                fonts_dir.join(BOLD_FONT_FILE),
                BuiltinFont::HelveticaBold,
            ),
            italic: Self::load_variant(
                fonts_dir.join(ITALIC_FONT_FILE),
                BuiltinFont::HelveticaOblique,
            ),
        }
    }

    /// Builtin faces only; used by tests and headless environments.
    pub fn builtin() -> Self {
        let builtin = |font: BuiltinFont| FontVariant {
            source: FontSource::Builtin(font),
            metrics: FontMetrics::helvetica(),
        };
        Self {
            regular: builtin(BuiltinFont::Helvetica),
            bold: builtin(BuiltinFont::HelveticaBold),
            italic: builtin(BuiltinFont::HelveticaOblique),
        }
    }

    fn load_variant(path: PathBuf, fallback: BuiltinFont) -> FontVariant {
        match std::fs::read(&path)
            .ok()
            .and_then(|data| FontMetrics::from_ttf_bytes(&data))
        {
            Some(metrics) => FontVariant {
                source: FontSource::External(path),
                metrics,
            },
            None => {
                warn!(path = %path.display(), "font unavailable, using builtin face");
                FontVariant {
                    source: FontSource::Builtin(fallback),
                    metrics: FontMetrics::helvetica(),
                }
            }
        }
    }

    pub fn variant(&self, style: FontStyle) -> &FontVariant {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    pub fn text_width_mm(&self, text: &str, style: FontStyle, font_size_pt: f64) -> f64 {
        self.variant(style).metrics.text_width_mm(text, font_size_pt)
    }
}
