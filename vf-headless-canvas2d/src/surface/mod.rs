//! The native drawing surface seam.
//!
//! [`CanvasContext`](crate::CanvasContext) translates browser-style calls into calls on a
//! [`NativeSurface`]. The surface owns the canonical transform and the current path, and
//! does the actual rasterization and encoding.

mod pixmap;
mod recording;

pub use pixmap::{PixmapSurface, PixmapSurfaceFactory};
pub use recording::{RecordingSurface, RecordingSurfaceFactory, SurfaceCall};

use crate::color::Color;
use crate::dom_matrix::DOMMatrix;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{ArcParams, CubicBezierParams, QuadraticBezierParams, RectParams};
use std::path::Path;

/// Pixel density of a zoom-1 surface.
pub const BASE_PPI: f64 = 72.0;

/// Everything a surface needs at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSpec {
    /// Logical width; the backing store is `width * zoom` pixels wide.
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub background: Color,
    pub foreground: Color,
}

impl SurfaceSpec {
    /// Backing store size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64) * self.zoom).round().max(1.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

/// Font selection for a single glyph run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle<'a> {
    /// `None` selects the surface's default family.
    pub family: Option<&'a str>,
    /// Size in points.
    pub size_pt: f64,
    pub italic: bool,
    pub bold: bool,
}

impl GlyphStyle<'_> {
    /// Size in CSS pixels.
    pub fn size_px(&self) -> f64 {
        self.size_pt * 4.0 / 3.0
    }
}

/// Per-codepoint measurements in surface coordinates.
///
/// The surface is y-down: ascents above the baseline are negative, descents positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub advance: f64,
    /// Font-level ascent (negative).
    pub ascent: f64,
    /// Font-level descent.
    pub descent: f64,
    /// Top of the glyph's ink (negative when above the baseline).
    pub actual_ascent: f64,
    /// Bottom of the glyph's ink.
    pub actual_descent: f64,
}

/// How a filled rectangle combines with what is already painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Source-over.
    Blend,
    /// Overwrite the destination, alpha included.
    Replace,
}

/// A pre-rasterizing 2D drawing backend.
///
/// Path methods take coordinates in user space; the surface applies its own transform.
pub trait NativeSurface {
    /// Logical width.
    fn width(&self) -> u32;
    /// Logical height.
    fn height(&self) -> u32;

    /// Paint the whole surface with `color`, replacing existing pixels.
    fn clear(&mut self, color: Color);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, params: &CubicBezierParams);
    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams);
    fn rect(&mut self, params: &RectParams);
    fn arc(&mut self, params: &ArcParams);
    fn close_path(&mut self);

    /// Fill the current path and discard it.
    fn fill(&mut self, color: Color);
    /// Stroke the current path and discard it.
    fn stroke(&mut self, line_width: f64, color: Color);

    fn fill_rect(&mut self, rect: &RectParams, color: Color, mode: PaintMode);
    /// Draw `text` with its alphabetic baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &GlyphStyle<'_>, color: Color);
    fn measure_glyph(&mut self, c: char, style: &GlyphStyle<'_>) -> GlyphMetrics;

    /// The user transform, without the zoom factor.
    fn get_transform(&self) -> DOMMatrix;
    fn set_transform(&mut self, matrix: DOMMatrix);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn encode_png(&self) -> Canvas2dResult<Vec<u8>>;

    /// Encode and write to `path`, creating parent directories as needed.
    fn save_png(&self, path: &Path) -> Canvas2dResult<()> {
        let data = self.encode_png()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, data)?;
        log::info!(target: "canvas", "saved {}", path.display());
        Ok(())
    }
}

/// Builds surfaces for new canvases.
pub trait SurfaceFactory {
    type Surface: NativeSurface;

    fn create_surface(&self, spec: &SurfaceSpec) -> Canvas2dResult<Self::Surface>;
}

/// Encode straight (non-premultiplied) RGBA8 data as PNG, tagged with `ppi`.
pub(crate) fn encode_rgba_png(
    width: u32,
    height: u32,
    data: &[u8],
    ppi: f64,
) -> Canvas2dResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(Canvas2dError::PngError(format!(
            "expected {expected} bytes of RGBA data, got {}",
            data.len()
        )));
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        // Pixels per meter
        let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(png_data)
}
