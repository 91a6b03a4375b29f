//! Canvas 2D rendering context emulation.
//!
//! [`CanvasContext`] tracks the paint state and the open-path flag, and forwards every
//! drawing call to its [`NativeSurface`] after resolving colors and fonts and applying
//! the sub-pixel offset.

mod drawing;
mod path_ops;
mod text_rendering;
mod transform;

use crate::color::Color;
use crate::drawing_state::{DrawingState, SavedState};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_parser::FontDescriptor;
use crate::geometry::PixelOffset;
use crate::surface::NativeSurface;

/// How strictly path calls are checked against the open-path flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// `beginPath` while a path is open, or painting or adding segments with no open
    /// path, is an invariant violation.
    #[default]
    Strict,
    /// `beginPath` restarts the path, segments open one implicitly, and painting with no
    /// open path does nothing.
    Lenient,
}

/// Canvas-level colors used when resolving styles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Color painted by `clearRect`.
    pub background: Color,
    pub foreground: Color,
    /// Replace every fill and stroke color with `foreground`.
    pub force_foreground: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            foreground: Color::BLACK,
            force_foreground: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContextOptions {
    /// Added to every path and rectangle coordinate.
    pub path_offset: PixelOffset,
    /// Added to text positions.
    pub text_offset: PixelOffset,
    pub path_mode: PathMode,
}

/// The 2D context: a drawing state machine in front of a native surface.
pub struct CanvasContext<S: NativeSurface> {
    pub(crate) surface: S,
    pub(crate) state: DrawingState,
    stack: Vec<SavedState>,
    pub(crate) in_path: bool,
    pub(crate) palette: Palette,
    pub(crate) options: ContextOptions,
}

impl<S: NativeSurface> CanvasContext<S> {
    pub fn new(surface: S, palette: Palette, options: ContextOptions) -> Canvas2dResult<Self> {
        Ok(Self {
            surface,
            state: DrawingState::new(palette.foreground)?,
            stack: Vec::new(),
            in_path: false,
            palette,
            options,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Whether a path is open.
    pub fn in_path(&self) -> bool {
        self.in_path
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Number of saved states.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // --- State stack ---

    /// Push the paint state and the surface transform.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.stack.push(SavedState {
            state: self.state.clone(),
            transform: self.surface.get_transform(),
        });
    }

    /// Pop and reapply the last saved state. An empty stack is logged and ignored.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        match self.stack.pop() {
            Some(saved) => {
                self.state = saved.state;
                self.surface.set_transform(saved.transform);
            }
            None => log::error!(target: "canvas", "restore() called with empty stack"),
        }
    }

    // --- Style properties ---

    pub fn font(&self) -> &str {
        self.state.font.raw()
    }

    pub fn parsed_font(&self) -> &FontDescriptor {
        self.state.font.parsed()
    }

    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "font = {}", font);
        self.state.font.set(font)
    }

    pub fn fill_style(&self) -> &str {
        self.state.fill_style.raw()
    }

    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "fillStyle = {}", style);
        self.state.fill_style.set(style)
    }

    pub fn stroke_style(&self) -> &str {
        self.state.stroke_style.raw()
    }

    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "strokeStyle = {}", style);
        self.state.stroke_style.set(style)
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    /// Set the line width. Non-finite and non-positive values are ignored.
    pub fn set_line_width(&mut self, width: f64) {
        log::debug!(target: "canvas", "lineWidth = {}", width);
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Accepted for compatibility. Strokes are always solid.
    pub fn set_line_dash(&mut self, segments: &[f64]) {
        log::debug!(target: "canvas", "setLineDash {:?} ignored", segments);
    }

    // --- Color resolution ---

    pub(crate) fn resolved_fill(&self) -> Color {
        self.resolve(self.state.fill_style.color())
    }

    pub(crate) fn resolved_stroke(&self) -> Color {
        self.resolve(self.state.stroke_style.color())
    }

    fn resolve(&self, color: Color) -> Color {
        if self.palette.force_foreground {
            self.palette.foreground
        } else {
            color
        }
    }

    pub(crate) fn violation(message: impl Into<String>) -> Canvas2dError {
        Canvas2dError::InvariantViolation(message.into())
    }
}
