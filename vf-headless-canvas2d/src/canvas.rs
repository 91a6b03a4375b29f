//! The `HTMLCanvasElement` stand-in: one context over one surface.

use crate::color::{parse_color, Color};
use crate::context::{CanvasContext, ContextOptions, Palette, PathMode};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::PixelOffset;
use crate::surface::{NativeSurface, SurfaceFactory, SurfaceSpec};
use std::path::Path;

/// Value returned by `toDataURL()`. Callers only probe for the method's existence.
pub const DATA_URL_PLACEHOLDER: &str = "<URL>";

/// Construction options for a [`Canvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasOptions {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    /// CSS color painted at creation and by `clearRect`.
    pub background: String,
    /// CSS color for the initial styles and for `force_foreground`.
    pub foreground: String,
    pub force_foreground: bool,
    /// `None` uses the calibrated `-0.3 / zoom` offset.
    pub path_offset: Option<PixelOffset>,
    pub text_offset: PixelOffset,
    pub path_mode: PathMode,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            zoom: 1.0,
            background: "#fff".to_string(),
            foreground: "#000".to_string(),
            force_foreground: false,
            path_offset: None,
            text_offset: PixelOffset::ZERO,
            path_mode: PathMode::Strict,
        }
    }
}

impl CanvasOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = color.into();
        self
    }

    pub fn with_force_foreground(mut self, force: bool) -> Self {
        self.force_foreground = force;
        self
    }

    pub fn with_path_offset(mut self, offset: PixelOffset) -> Self {
        self.path_offset = Some(offset);
        self
    }

    pub fn with_text_offset(mut self, offset: PixelOffset) -> Self {
        self.text_offset = offset;
        self
    }

    pub fn with_path_mode(mut self, mode: PathMode) -> Self {
        self.path_mode = mode;
        self
    }

    /// Check dimensions and zoom and parse both colors.
    pub fn to_surface_spec(&self) -> Canvas2dResult<SurfaceSpec> {
        if self.width == 0 || self.height == 0 {
            return Err(Canvas2dError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(Canvas2dError::InvalidZoom(self.zoom));
        }
        Ok(SurfaceSpec {
            width: self.width,
            height: self.height,
            zoom: self.zoom,
            background: parse_color(&self.background)?,
            foreground: parse_color(&self.foreground)?,
        })
    }

    fn context_options(&self) -> ContextOptions {
        ContextOptions {
            path_offset: self
                .path_offset
                .unwrap_or_else(|| PixelOffset::for_zoom(self.zoom)),
            text_offset: self.text_offset,
            path_mode: self.path_mode,
        }
    }
}

/// A canvas owning exactly one 2D context and its surface.
pub struct Canvas<S: NativeSurface> {
    width: u32,
    height: u32,
    zoom: f64,
    context: CanvasContext<S>,
}

impl<S: NativeSurface> Canvas<S> {
    /// Build a canvas on a surface from `factory`.
    pub fn new<F>(factory: &F, options: &CanvasOptions) -> Canvas2dResult<Self>
    where
        F: SurfaceFactory<Surface = S> + ?Sized,
    {
        let spec = options.to_surface_spec()?;
        log::debug!(
            target: "canvas",
            "new canvas {}x{} zoom {}",
            spec.width,
            spec.height,
            spec.zoom
        );
        let surface = factory.create_surface(&spec)?;
        let palette = Palette {
            background: spec.background,
            foreground: spec.foreground,
            force_foreground: options.force_foreground,
        };
        Ok(Self {
            width: spec.width,
            height: spec.height,
            zoom: spec.zoom,
            context: CanvasContext::new(surface, palette, options.context_options())?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn background(&self) -> Color {
        self.context.palette().background
    }

    pub fn foreground(&self) -> Color {
        self.context.palette().foreground
    }

    pub fn force_foreground(&self) -> bool {
        self.context.palette().force_foreground
    }

    /// The context for `kind`. Only `"2d"` is supported.
    pub fn get_context(&mut self, kind: &str) -> Canvas2dResult<&mut CanvasContext<S>> {
        if kind != "2d" {
            return Err(Canvas2dError::UnsupportedContext(kind.to_string()));
        }
        Ok(&mut self.context)
    }

    pub fn context(&self) -> &CanvasContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CanvasContext<S> {
        &mut self.context
    }

    pub fn to_data_url(&self) -> &'static str {
        DATA_URL_PLACEHOLDER
    }

    pub fn to_png(&self) -> Canvas2dResult<Vec<u8>> {
        self.context.surface().encode_png()
    }

    pub fn save_png(&self, path: &Path) -> Canvas2dResult<()> {
        self.context.surface().save_png(path)
    }

    pub fn into_context(self) -> CanvasContext<S> {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, RecordingSurfaceFactory, SurfaceCall};
    use rstest::rstest;

    fn canvas(options: &CanvasOptions) -> Canvas<RecordingSurface> {
        Canvas::new(&RecordingSurfaceFactory, options).unwrap()
    }

    #[test]
    fn test_get_context() {
        let mut c = canvas(&CanvasOptions::new(10, 10));
        assert!(c.get_context("2d").is_ok());
        assert!(matches!(
            c.get_context("webgl"),
            Err(Canvas2dError::UnsupportedContext(_))
        ));
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(canvas(&CanvasOptions::default()).to_data_url(), "<URL>");
    }

    #[rstest]
    #[case(CanvasOptions::new(0, 10))]
    #[case(CanvasOptions::new(10, 10).with_zoom(0.0))]
    #[case(CanvasOptions::new(10, 10).with_zoom(f64::NAN))]
    #[case(CanvasOptions::new(10, 10).with_background("bogus"))]
    fn test_invalid_options(#[case] options: CanvasOptions) {
        assert!(Canvas::new(&RecordingSurfaceFactory, &options).is_err());
    }

    #[test]
    fn test_default_path_offset_tracks_zoom() {
        let mut c = canvas(&CanvasOptions::new(10, 10).with_zoom(3.0));
        let ctx = c.get_context("2d").unwrap();
        assert_eq!(ctx.options().path_offset, PixelOffset::for_zoom(3.0));
        assert_eq!(ctx.options().text_offset, PixelOffset::ZERO);
    }

    #[test]
    fn test_surface_cleared_to_background() {
        let c = canvas(&CanvasOptions::new(10, 10).with_background("#00000000"));
        assert_eq!(
            c.context().surface().calls(),
            &[SurfaceCall::Clear(Color::TRANSPARENT)]
        );
        assert_eq!(c.background(), Color::TRANSPARENT);
    }

    #[test]
    fn test_to_png() {
        let c = canvas(&CanvasOptions::new(3, 2).with_zoom(2.0));
        let png = c.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
