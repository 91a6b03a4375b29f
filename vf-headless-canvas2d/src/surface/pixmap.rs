//! tiny-skia surface with cosmic-text glyph outlines.

use super::{
    encode_rgba_png, GlyphMetrics, GlyphStyle, NativeSurface, PaintMode, SurfaceFactory,
    SurfaceSpec, BASE_PPI,
};
use crate::arc::arc_to_cubics;
use crate::color::Color;
use crate::dom_matrix::DOMMatrix;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use crate::geometry::{ArcParams, CubicBezierParams, QuadraticBezierParams, RectParams};
use cosmic_text::{
    Attrs, Buffer, CacheKey, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, Style,
    SwashCache, Weight,
};
use tiny_skia::{BlendMode, FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Maximum backing store dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Codepoints the engraving library emits that the bundled music font lacks, mapped to
/// the glyphs that stand in for them.
fn remap_codepoint(c: char) -> char {
    match c {
        '\u{25b3}' => '\u{e873}',
        '\u{00f8}' => '\u{e871}',
        '\u{25cb}' => '\u{e870}',
        '\u{e31a}' | '\u{e31b}' | '\u{e3de}' | '\u{e3df}' => ' ',
        other => other,
    }
}

/// One shaped codepoint: its advance and the cache keys of its glyphs.
struct ShapedChar {
    advance: f32,
    glyphs: Vec<(CacheKey, f32, f32)>,
    font_id: Option<cosmic_text::fontdb::ID>,
}

/// A raster surface of `width * zoom` by `height * zoom` pixels.
pub struct PixmapSurface {
    spec: SurfaceSpec,
    pixmap: Pixmap,
    font_system: FontSystem,
    swash_cache: SwashCache,
    hinting_enabled: bool,
    /// User transform; the zoom factor is applied on top of it.
    transform: Transform,
    /// Current path, already in device space.
    path: PathBuilder,
    has_current_point: bool,
}

impl PixmapSurface {
    pub fn new(spec: &SurfaceSpec, fonts: &ResolvedFontConfig) -> Canvas2dResult<Self> {
        let (width, height) = spec.pixel_size();
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        pixmap.fill(spec.background.into());

        let font_system =
            FontSystem::new_with_locale_and_db("en".to_string(), (*fonts.fontdb).clone());

        Ok(Self {
            spec: *spec,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            hinting_enabled: fonts.hinting_enabled,
            transform: Transform::identity(),
            path: PathBuilder::new(),
            has_current_point: false,
        })
    }

    /// Straight-alpha RGBA bytes of the whole backing store.
    pub fn get_image_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        data
    }

    /// Backing store size in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    fn device_transform(&self) -> Transform {
        let zoom = self.spec.zoom as f32;
        Transform::from_scale(zoom, zoom).pre_concat(self.transform)
    }

    fn map(&self, x: f64, y: f64) -> (f32, f32) {
        let t = self.device_transform();
        let (x, y) = (x as f32, y as f32);
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }

    fn take_path(&mut self) -> Option<tiny_skia::Path> {
        self.has_current_point = false;
        std::mem::replace(&mut self.path, PathBuilder::new()).finish()
    }

    fn paint(color: Color, mode: PaintMode) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.into());
        paint.anti_alias = true;
        if mode == PaintMode::Replace {
            paint.blend_mode = BlendMode::Source;
        }
        paint
    }

    fn shape_char(&mut self, c: char, style: &GlyphStyle<'_>) -> ShapedChar {
        let size_px = style.size_px() as f32;
        let metrics = Metrics::new(size_px, size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let family = style.family.map(Family::Name).unwrap_or(Family::SansSerif);
        let mut attrs = Attrs::new()
            .family(family)
            .weight(if style.bold { Weight::BOLD } else { Weight::NORMAL })
            .style(if style.italic { Style::Italic } else { Style::Normal });
        if !self.hinting_enabled {
            attrs = attrs.cache_key_flags(CacheKeyFlags::DISABLE_HINTING);
        }

        let mut text = [0u8; 4];
        let text = remap_codepoint(c).encode_utf8(&mut text);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut shaped = ShapedChar {
            advance: 0.0,
            glyphs: Vec::new(),
            font_id: None,
        };
        for run in buffer.layout_runs() {
            shaped.advance = shaped.advance.max(run.line_w);
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                shaped.font_id.get_or_insert(glyph.font_id);
                shaped.glyphs.push((
                    physical.cache_key,
                    glyph.x + glyph.font_size * glyph.x_offset,
                    glyph.y - glyph.font_size * glyph.y_offset,
                ));
            }
        }
        shaped
    }

    /// Ascender and descender of a face in pixels, y-down.
    fn font_extents(&self, id: cosmic_text::fontdb::ID, size_px: f32) -> Option<(f32, f32)> {
        self.font_system
            .db()
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let scale = size_px / face.units_per_em() as f32;
                Some((
                    -(face.ascender() as f32) * scale,
                    -(face.descender() as f32) * scale,
                ))
            })
            .flatten()
    }
}

/// Build a path from a glyph outline. Outlines are y-up, so y is negated.
fn glyph_path(
    swash_cache: &mut SwashCache,
    font_system: &mut FontSystem,
    key: CacheKey,
) -> Option<tiny_skia::Path> {
    let commands = swash_cache.get_outline_commands(font_system, key)?;
    let mut builder = PathBuilder::new();
    for cmd in commands {
        match cmd {
            Command::MoveTo(p) => builder.move_to(p.x, -p.y),
            Command::LineTo(p) => builder.line_to(p.x, -p.y),
            Command::QuadTo(ctrl, end) => builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y),
            Command::CurveTo(c1, c2, end) => {
                builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
            }
            Command::Close => builder.close(),
        }
    }
    builder.finish()
}

impl NativeSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.spec.width
    }

    fn height(&self) -> u32 {
        self.spec.height
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.into());
    }

    fn begin_path(&mut self) {
        self.path = PathBuilder::new();
        self.has_current_point = false;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        self.path.move_to(x, y);
        self.has_current_point = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.map(x, y);
        if self.has_current_point {
            self.path.line_to(x, y);
        } else {
            self.path.move_to(x, y);
            self.has_current_point = true;
        }
    }

    fn bezier_curve_to(&mut self, p: &CubicBezierParams) {
        if !self.has_current_point {
            self.move_to(p.cp1x, p.cp1y);
        }
        let (x1, y1) = self.map(p.cp1x, p.cp1y);
        let (x2, y2) = self.map(p.cp2x, p.cp2y);
        let (x, y) = self.map(p.x, p.y);
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn quadratic_curve_to(&mut self, p: &QuadraticBezierParams) {
        if !self.has_current_point {
            self.move_to(p.cpx, p.cpy);
        }
        let (x1, y1) = self.map(p.cpx, p.cpy);
        let (x, y) = self.map(p.x, p.y);
        self.path.quad_to(x1, y1, x, y);
    }

    fn rect(&mut self, r: &RectParams) {
        let corners = [
            self.map(r.x, r.y),
            self.map(r.x + r.width, r.y),
            self.map(r.x + r.width, r.y + r.height),
            self.map(r.x, r.y + r.height),
        ];
        self.path.move_to(corners[0].0, corners[0].1);
        for (x, y) in &corners[1..] {
            self.path.line_to(*x, *y);
        }
        self.path.close();
        self.has_current_point = true;
    }

    fn arc(&mut self, params: &ArcParams) {
        let Some(curves) = arc_to_cubics(params) else {
            log::debug!(target: "canvas", "arc with invalid radius {} ignored", params.radius);
            return;
        };
        let (sx, sy) = curves.start;
        if self.has_current_point {
            self.line_to(sx, sy);
        } else {
            self.move_to(sx, sy);
        }
        for segment in &curves.segments {
            let (x1, y1) = self.map(segment.cp1x, segment.cp1y);
            let (x2, y2) = self.map(segment.cp2x, segment.cp2y);
            let (x, y) = self.map(segment.x, segment.y);
            self.path.cubic_to(x1, y1, x2, y2, x, y);
        }
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn fill(&mut self, color: Color) {
        if let Some(path) = self.take_path() {
            let paint = Self::paint(color, PaintMode::Blend);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke(&mut self, line_width: f64, color: Color) {
        // Points are in device space, so the width is scaled by the average axis scale.
        let t = self.device_transform();
        let scale = ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0;
        if let Some(path) = self.take_path() {
            let paint = Self::paint(color, PaintMode::Blend);
            let stroke = Stroke {
                width: line_width as f32 * scale,
                line_cap: LineCap::Butt,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill_rect(&mut self, rect: &RectParams, color: Color, mode: PaintMode) {
        let rect = rect.normalized();
        let Some(r) = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            log::debug!(target: "canvas", "empty rect {:?} ignored", rect);
            return;
        };
        let paint = Self::paint(color, mode);
        let transform = self.device_transform();
        self.pixmap.fill_rect(r, &paint, transform, None);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &GlyphStyle<'_>, color: Color) {
        let paint = Self::paint(color, PaintMode::Blend);
        let transform = self.device_transform();
        let mut pen_x = x as f32;
        let baseline = y as f32;

        for c in text.chars() {
            let shaped = self.shape_char(c, style);
            for (key, gx, gy) in &shaped.glyphs {
                if let Some(path) = glyph_path(&mut self.swash_cache, &mut self.font_system, *key)
                {
                    let glyph_transform =
                        Transform::from_translate(pen_x + gx, baseline + gy).post_concat(transform);
                    self.pixmap
                        .fill_path(&path, &paint, FillRule::Winding, glyph_transform, None);
                }
            }
            pen_x += shaped.advance;
        }
    }

    fn measure_glyph(&mut self, c: char, style: &GlyphStyle<'_>) -> GlyphMetrics {
        let size_px = style.size_px() as f32;
        let shaped = self.shape_char(c, style);

        let (ascent, descent) = shaped
            .font_id
            .and_then(|id| self.font_extents(id, size_px))
            .unwrap_or((-0.8 * size_px, 0.2 * size_px));

        let mut ink: Option<(f32, f32)> = None;
        for (key, _, gy) in &shaped.glyphs {
            if let Some(path) = glyph_path(&mut self.swash_cache, &mut self.font_system, *key) {
                let bounds = path.bounds();
                let (top, bottom) = (bounds.top() + gy, bounds.bottom() + gy);
                ink = Some(match ink {
                    Some((t, b)) => (t.min(top), b.max(bottom)),
                    None => (top, bottom),
                });
            }
        }
        let (actual_ascent, actual_descent) = ink.unwrap_or((0.0, 0.0));

        GlyphMetrics {
            advance: shaped.advance as f64,
            ascent: ascent as f64,
            descent: descent as f64,
            actual_ascent: actual_ascent as f64,
            actual_descent: actual_descent as f64,
        }
    }

    fn get_transform(&self) -> DOMMatrix {
        self.transform.into()
    }

    fn set_transform(&mut self, matrix: DOMMatrix) {
        self.transform = matrix.into();
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform = self.transform.pre_translate(x as f32, y as f32);
    }

    fn rotate(&mut self, angle: f64) {
        let degrees = angle.to_degrees() as f32;
        self.transform = self.transform.pre_concat(Transform::from_rotate(degrees));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.transform = self.transform.pre_scale(x as f32, y as f32);
    }

    fn encode_png(&self) -> Canvas2dResult<Vec<u8>> {
        encode_rgba_png(
            self.pixmap.width(),
            self.pixmap.height(),
            &self.get_image_data(),
            BASE_PPI * self.spec.zoom,
        )
    }
}

/// Creates [`PixmapSurface`]s sharing one resolved font database.
#[derive(Debug, Clone)]
pub struct PixmapSurfaceFactory {
    fonts: ResolvedFontConfig,
}

impl PixmapSurfaceFactory {
    pub fn new(fonts: ResolvedFontConfig) -> Self {
        Self { fonts }
    }

    pub fn from_config(config: &FontConfig) -> Self {
        Self::new(config.resolve())
    }

    pub fn fonts(&self) -> &ResolvedFontConfig {
        &self.fonts
    }
}

impl SurfaceFactory for PixmapSurfaceFactory {
    type Surface = PixmapSurface;

    fn create_surface(&self, spec: &SurfaceSpec) -> Canvas2dResult<PixmapSurface> {
        PixmapSurface::new(spec, &self.fonts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(width: u32, height: u32, zoom: f64) -> PixmapSurface {
        let fonts = FontConfig::default().with_system_fonts(false).resolve();
        let spec = SurfaceSpec {
            width,
            height,
            zoom,
            background: Color::WHITE,
            foreground: Color::BLACK,
        };
        PixmapSurface::new(&spec, &fonts).unwrap()
    }

    fn pixel(s: &PixmapSurface, x: u32, y: u32) -> [u8; 4] {
        let data = s.get_image_data();
        let i = ((y * s.pixel_width() + x) * 4) as usize;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn test_background_fill() {
        let s = surface(4, 3, 1.0);
        assert_eq!(pixel(&s, 2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_zoom_scales_backing_store() {
        let s = surface(10, 5, 2.0);
        assert_eq!((s.pixel_width(), s.pixel_height()), (20, 10));
        assert_eq!((s.width(), s.height()), (10, 5));
        assert!(s.get_transform().is_identity());
    }

    #[test]
    fn test_fill_rect_zoomed() {
        let mut s = surface(10, 10, 2.0);
        s.fill_rect(
            &RectParams::new(0.0, 0.0, 5.0, 5.0),
            Color::new(1.0, 0.0, 0.0, 1.0),
            PaintMode::Blend,
        );
        assert_eq!(pixel(&s, 8, 8), [255, 0, 0, 255]);
        assert_eq!(pixel(&s, 12, 12), [255, 255, 255, 255]);
    }

    #[test]
    fn test_replace_mode_writes_alpha() {
        let mut s = surface(4, 4, 1.0);
        s.fill_rect(
            &RectParams::new(0.0, 0.0, 4.0, 4.0),
            Color::TRANSPARENT,
            PaintMode::Replace,
        );
        assert_eq!(pixel(&s, 1, 1)[3], 0);
    }

    #[test]
    fn test_fill_path() {
        let mut s = surface(10, 10, 1.0);
        s.begin_path();
        s.rect(&RectParams::new(2.0, 2.0, 6.0, 6.0));
        s.fill(Color::BLACK);
        assert_eq!(pixel(&s, 5, 5), [0, 0, 0, 255]);
        assert_eq!(pixel(&s, 0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_translate_applies_to_later_points() {
        let mut s = surface(10, 10, 1.0);
        s.translate(5.0, 5.0);
        s.fill_rect(
            &RectParams::new(0.0, 0.0, 2.0, 2.0),
            Color::BLACK,
            PaintMode::Blend,
        );
        assert_eq!(pixel(&s, 6, 6), [0, 0, 0, 255]);
        assert_eq!(pixel(&s, 1, 1), [255, 255, 255, 255]);
        assert_eq!(s.get_transform(), DOMMatrix::new(1.0, 0.0, 0.0, 1.0, 5.0, 5.0));
    }

    #[test]
    fn test_measure_without_fonts_falls_back() {
        let mut s = surface(10, 10, 1.0);
        let style = GlyphStyle {
            family: Some("Bravura"),
            size_pt: 30.0,
            italic: false,
            bold: false,
        };
        let m = s.measure_glyph('\0', &style);
        assert!(m.advance.is_finite());
        assert!(m.ascent <= 0.0);
        assert!(m.descent >= 0.0);
    }

    #[test]
    fn test_remap_codepoint() {
        assert_eq!(remap_codepoint('\u{25b3}'), '\u{e873}');
        assert_eq!(remap_codepoint('\u{e3df}'), ' ');
        assert_eq!(remap_codepoint('a'), 'a');
    }

    #[test]
    fn test_encode_png_is_deterministic() {
        let mut s = surface(8, 8, 1.0);
        s.begin_path();
        s.move_to(1.0, 1.0);
        s.line_to(7.0, 7.0);
        s.stroke(1.0, Color::BLACK);
        assert_eq!(s.encode_png().unwrap(), s.encode_png().unwrap());
    }
}
