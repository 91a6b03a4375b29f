//! Text operations for CanvasContext.

use super::CanvasContext;
use crate::surface::NativeSurface;
use crate::text::TextMetrics;

impl<S: NativeSurface> CanvasContext<S> {
    /// Measure text in the current font. Empty or absent text measures U+0000.
    pub fn measure_text(&mut self, text: Option<&str>) -> TextMetrics {
        let font = self.state.font.parsed();
        crate::text::measure_text(&mut self.surface, text, font)
    }

    /// Draw text in the current font and fill style with its baseline at `(x, y)`.
    ///
    /// Text positions get the text offset, not the path offset.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        let (x, y) = self.options.text_offset.apply(x, y);
        let color = self.resolved_fill();
        let style = self.state.font.parsed().glyph_style();
        self.surface.fill_text(text, x, y, &style, color);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::super::{ContextOptions, Palette};
    use crate::color::Color;
    use crate::geometry::PixelOffset;
    use crate::surface::SurfaceCall;

    #[test]
    fn test_fill_text_uses_text_offset_only() {
        let options = ContextOptions {
            path_offset: PixelOffset::new(-0.3, -0.3),
            text_offset: PixelOffset::new(1.0, 2.0),
            ..ContextOptions::default()
        };
        let mut ctx = context(Palette::default(), options);
        ctx.set_font("bold 20pt Bravura,Academico").unwrap();
        ctx.set_fill_style("red").unwrap();
        ctx.fill_text("abc", 10.0, 20.0);

        assert_eq!(
            ctx.surface().calls().last(),
            Some(&SurfaceCall::FillText {
                text: "abc".to_string(),
                x: 11.0,
                y: 22.0,
                family: Some("Bravura".to_string()),
                size_pt: 20.0,
                bold: true,
                italic: false,
                color: Color::new(1.0, 0.0, 0.0, 1.0),
            })
        );
    }

    #[test]
    fn test_measure_text_fallback() {
        let mut ctx = context(Palette::default(), ContextOptions::default());
        let m = ctx.measure_text(Some(""));
        assert_eq!(m.width, 0.0);
        assert!(m.font_bounding_box_ascent > 0.0);
        assert_eq!(ctx.measure_text(None), m);
    }
}
