//! Fill, stroke and rectangle operations for CanvasContext.

use super::{CanvasContext, PathMode};
use crate::error::Canvas2dResult;
use crate::geometry::RectParams;
use crate::surface::{NativeSurface, PaintMode};

impl<S: NativeSurface> CanvasContext<S> {
    /// Close out the open path for a paint call. Returns false when there is nothing to
    /// paint (lenient mode only).
    fn finish_path(&mut self, op: &str) -> Canvas2dResult<bool> {
        if self.in_path {
            self.in_path = false;
            return Ok(true);
        }
        match self.options.path_mode {
            PathMode::Strict => Err(Self::violation(format!(
                "{op}() called without beginPath()"
            ))),
            PathMode::Lenient => {
                log::debug!(target: "canvas", "{} with no open path ignored", op);
                Ok(false)
            }
        }
    }

    /// Fill the open path with the fill style and close it.
    pub fn fill(&mut self) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "fill");
        if self.finish_path("fill")? {
            let color = self.resolved_fill();
            self.surface.fill(color);
        }
        Ok(())
    }

    /// Stroke the open path with the stroke style and line width and close it.
    pub fn stroke(&mut self) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "stroke");
        if self.finish_path("stroke")? {
            let color = self.resolved_stroke();
            self.surface.stroke(self.state.line_width, color);
        }
        Ok(())
    }

    /// Fill a rectangle with the fill style. Independent of the open path.
    pub fn fill_rect(&mut self, rect: &RectParams) {
        log::debug!(target: "canvas", "fillRect {:?}", rect);
        let rect = self.options.path_offset.rect(&rect.normalized());
        let color = self.resolved_fill();
        self.surface.fill_rect(&rect, color, PaintMode::Blend);
    }

    /// Paint a rectangle with the canvas background color, replacing what is there.
    pub fn clear_rect(&mut self, rect: &RectParams) {
        log::debug!(target: "canvas", "clearRect {:?}", rect);
        let rect = self.options.path_offset.rect(&rect.normalized());
        self.surface
            .fill_rect(&rect, self.palette.background, PaintMode::Replace);
    }
}
