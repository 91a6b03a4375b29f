//! Text measurement against a native surface.

use crate::font_parser::FontDescriptor;
use crate::surface::{GlyphStyle, NativeSurface};

/// Text metrics returned by measureText().
///
/// Ascents are positive upwards, as the rendering library expects.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Sum of the per-codepoint advances.
    pub width: f64,
    pub font_bounding_box_ascent: f64,
    pub font_bounding_box_descent: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
}

impl FontDescriptor {
    /// The surface-level style for this descriptor.
    pub fn glyph_style(&self) -> GlyphStyle<'_> {
        GlyphStyle {
            family: self.primary_family(),
            size_pt: self.size,
            italic: self.italic,
            bold: self.bold,
        }
    }
}

/// Measure `text` one codepoint at a time.
///
/// Empty or absent text is measured as a single U+0000. Ascent and descent come from
/// the first codepoint only.
pub fn measure_text<S: NativeSurface + ?Sized>(
    surface: &mut S,
    text: Option<&str>,
    font: &FontDescriptor,
) -> TextMetrics {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => "\0",
    };
    let style = font.glyph_style();

    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return TextMetrics::default();
    };
    let head = surface.measure_glyph(first, &style);
    let width = chars.fold(head.advance, |width, c| {
        width + surface.measure_glyph(c, &style).advance
    });

    TextMetrics {
        width,
        font_bounding_box_ascent: -head.ascent,
        font_bounding_box_descent: head.descent,
        actual_bounding_box_ascent: -head.actual_ascent,
        actual_bounding_box_descent: head.actual_descent,
    }
}
