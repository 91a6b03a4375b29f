//! Transform operations for CanvasContext. The surface owns the matrix.

use super::CanvasContext;
use crate::dom_matrix::DOMMatrix;
use crate::surface::NativeSurface;

impl<S: NativeSurface> CanvasContext<S> {
    pub fn translate(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.surface.translate(x, y);
    }

    /// Rotate by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        log::debug!(target: "canvas", "rotate {}", angle);
        self.surface.rotate(angle);
    }

    pub fn scale(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.surface.scale(x, y);
    }

    /// Replace the transform.
    pub fn set_transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        self.surface.set_transform(matrix);
    }

    pub fn get_transform(&self) -> DOMMatrix {
        self.surface.get_transform()
    }
}
