//! A surface that records calls instead of painting.
//!
//! Glyph metrics are synthetic and depend only on the font size, so contexts driven by a
//! `RecordingSurface` behave identically on every machine.

use super::{
    encode_rgba_png, GlyphMetrics, GlyphStyle, NativeSurface, PaintMode, SurfaceFactory,
    SurfaceSpec, BASE_PPI,
};
use crate::color::Color;
use crate::dom_matrix::DOMMatrix;
use crate::error::Canvas2dResult;
use crate::geometry::{ArcParams, CubicBezierParams, QuadraticBezierParams, RectParams};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Clear(Color),
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    BezierCurveTo(CubicBezierParams),
    QuadraticCurveTo(QuadraticBezierParams),
    Rect(RectParams),
    Arc(ArcParams),
    ClosePath,
    Fill(Color),
    Stroke { line_width: f64, color: Color },
    FillRect {
        rect: RectParams,
        color: Color,
        mode: PaintMode,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        family: Option<String>,
        size_pt: f64,
        bold: bool,
        italic: bool,
        color: Color,
    },
    SetTransform(DOMMatrix),
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    spec: SurfaceSpec,
    transform: DOMMatrix,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(spec: &SurfaceSpec) -> Self {
        Self {
            spec: *spec,
            transform: DOMMatrix::identity(),
            calls: vec![SurfaceCall::Clear(spec.background)],
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn spec(&self) -> &SurfaceSpec {
        &self.spec
    }

    fn record(&mut self, call: SurfaceCall) {
        log::trace!(target: "canvas", "{:?}", call);
        self.calls.push(call);
    }
}

impl NativeSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.spec.width
    }

    fn height(&self) -> u32 {
        self.spec.height
    }

    fn clear(&mut self, color: Color) {
        self.record(SurfaceCall::Clear(color));
    }

    fn begin_path(&mut self) {
        self.record(SurfaceCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(SurfaceCall::LineTo { x, y });
    }

    fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        self.record(SurfaceCall::BezierCurveTo(*params));
    }

    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        self.record(SurfaceCall::QuadraticCurveTo(*params));
    }

    fn rect(&mut self, params: &RectParams) {
        self.record(SurfaceCall::Rect(*params));
    }

    fn arc(&mut self, params: &ArcParams) {
        self.record(SurfaceCall::Arc(*params));
    }

    fn close_path(&mut self) {
        self.record(SurfaceCall::ClosePath);
    }

    fn fill(&mut self, color: Color) {
        self.record(SurfaceCall::Fill(color));
    }

    fn stroke(&mut self, line_width: f64, color: Color) {
        self.record(SurfaceCall::Stroke { line_width, color });
    }

    fn fill_rect(&mut self, rect: &RectParams, color: Color, mode: PaintMode) {
        self.record(SurfaceCall::FillRect {
            rect: *rect,
            color,
            mode,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &GlyphStyle<'_>, color: Color) {
        self.record(SurfaceCall::FillText {
            text: text.to_string(),
            x,
            y,
            family: style.family.map(str::to_string),
            size_pt: style.size_pt,
            bold: style.bold,
            italic: style.italic,
            color,
        });
    }

    fn measure_glyph(&mut self, c: char, style: &GlyphStyle<'_>) -> GlyphMetrics {
        let px = style.size_px();
        let advance = if c == '\0' { 0.0 } else { px * 0.6 };
        GlyphMetrics {
            advance,
            ascent: -0.8 * px,
            descent: 0.2 * px,
            actual_ascent: -0.7 * px,
            actual_descent: 0.1 * px,
        }
    }

    fn get_transform(&self) -> DOMMatrix {
        self.transform
    }

    fn set_transform(&mut self, matrix: DOMMatrix) {
        self.transform = matrix;
        self.record(SurfaceCall::SetTransform(matrix));
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.set_transform(self.transform.translate(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.set_transform(self.transform.rotate(angle));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.set_transform(self.transform.scale(x, y));
    }

    /// A blank image of the surface's pixel size in its background color.
    fn encode_png(&self) -> Canvas2dResult<Vec<u8>> {
        let (width, height) = self.spec.pixel_size();
        let c = self.spec.background;
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let pixel = [channel(c.r), channel(c.g), channel(c.b), channel(c.a)];
        let data = pixel.repeat(width as usize * height as usize);
        encode_rgba_png(width, height, &data, BASE_PPI * self.spec.zoom)
    }
}

/// Creates [`RecordingSurface`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingSurfaceFactory;

impl SurfaceFactory for RecordingSurfaceFactory {
    type Surface = RecordingSurface;

    fn create_surface(&self, spec: &SurfaceSpec) -> Canvas2dResult<RecordingSurface> {
        Ok(RecordingSurface::new(spec))
    }
}
