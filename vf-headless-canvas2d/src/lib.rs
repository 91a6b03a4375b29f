//! Headless Canvas 2D emulation for browser-targeted music engraving.
//!
//! This crate lets code written against `CanvasRenderingContext2D` run without a
//! browser. It provides:
//! - CSS color and font shorthand parsing
//! - [`CanvasContext`], a drawing state machine with save/restore, sub-pixel offset
//!   correction and a foreground override
//! - the [`NativeSurface`] seam, with a `tiny-skia`/`cosmic-text` raster surface and a
//!   call-recording surface
//!
//! # Example
//!
//! ```rust,no_run
//! use vf_headless_canvas2d::{Canvas, CanvasOptions, FontConfig, PixmapSurfaceFactory};
//!
//! # fn main() -> Result<(), vf_headless_canvas2d::Canvas2dError> {
//! let factory = PixmapSurfaceFactory::from_config(&FontConfig::default());
//! let mut canvas = Canvas::new(&factory, &CanvasOptions::new(400, 300))?;
//! let ctx = canvas.get_context("2d")?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.begin_path()?;
//! ctx.move_to(10.0, 10.0)?;
//! ctx.line_to(100.0, 50.0)?;
//! ctx.stroke()?;
//! let png_data = canvas.to_png()?;
//! # Ok(())
//! # }
//! ```

mod arc;
mod canvas;
mod color;
mod context;
mod dom_matrix;
mod drawing_state;
mod error;
mod font_config;
mod font_parser;
mod geometry;
pub mod surface;
mod text;

// Re-export public API
pub use arc::{arc_to_cubics, ArcCurves};
pub use canvas::{Canvas, CanvasOptions, DATA_URL_PLACEHOLDER};
pub use color::{named_color_hex, parse_color, Color};
pub use context::{CanvasContext, ContextOptions, Palette, PathMode};
pub use dom_matrix::DOMMatrix;
pub use drawing_state::{DrawingState, FontSlot, SavedState, StyleSlot, DEFAULT_FONT};
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{
    CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig, ENGRAVING_FAMILIES,
};
pub use font_parser::{parse_font, FontDescriptor};
pub use geometry::{ArcParams, CubicBezierParams, PixelOffset, QuadraticBezierParams, RectParams};
pub use surface::{
    GlyphMetrics, GlyphStyle, NativeSurface, PaintMode, PixmapSurface, PixmapSurfaceFactory,
    RecordingSurface, RecordingSurfaceFactory, SurfaceCall, SurfaceFactory, SurfaceSpec,
};
pub use text::{measure_text, TextMetrics};
