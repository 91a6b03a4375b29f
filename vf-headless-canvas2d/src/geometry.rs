//! Parameter structs for Canvas 2D drawing operations.
//!
//! Coordinates are `f64`, matching the numbers the rendering library hands over.
//! Surfaces narrow them to their own precision.

/// Parameters for a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// X coordinate of the arc center.
    pub x: f64,
    /// Y coordinate of the arc center.
    pub y: f64,
    pub radius: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

/// Parameters for a cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierParams {
    pub cp1x: f64,
    pub cp1y: f64,
    pub cp2x: f64,
    pub cp2y: f64,
    pub x: f64,
    pub y: f64,
}

/// Parameters for a quadratic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezierParams {
    pub cpx: f64,
    pub cpy: f64,
    pub x: f64,
    pub y: f64,
}

/// Parameters for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    /// X coordinate of the rectangle origin.
    pub x: f64,
    /// Y coordinate of the rectangle origin.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectParams {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same area with a non-negative width and height.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }
}

/// Translation added to drawing coordinates before they reach the surface.
///
/// The rasterizer has a systematic antialiasing bias at a given zoom level; paths are
/// shifted by `-0.3 / zoom` on both axes to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

impl PixelOffset {
    pub const ZERO: PixelOffset = PixelOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The calibrated path offset for a zoom factor.
    pub fn for_zoom(zoom: f64) -> Self {
        Self::new(-0.3 / zoom, -0.3 / zoom)
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.x, y + self.y)
    }

    pub fn cubic(&self, p: &CubicBezierParams) -> CubicBezierParams {
        let (cp1x, cp1y) = self.apply(p.cp1x, p.cp1y);
        let (cp2x, cp2y) = self.apply(p.cp2x, p.cp2y);
        let (x, y) = self.apply(p.x, p.y);
        CubicBezierParams {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        }
    }

    pub fn quadratic(&self, p: &QuadraticBezierParams) -> QuadraticBezierParams {
        let (cpx, cpy) = self.apply(p.cpx, p.cpy);
        let (x, y) = self.apply(p.x, p.y);
        QuadraticBezierParams { cpx, cpy, x, y }
    }

    /// Shift the origin; the size is unchanged.
    pub fn rect(&self, r: &RectParams) -> RectParams {
        let (x, y) = self.apply(r.x, r.y);
        RectParams { x, y, ..*r }
    }

    /// Shift the center; radius and angles are unchanged.
    pub fn arc(&self, a: &ArcParams) -> ArcParams {
        let (x, y) = self.apply(a.x, a.y);
        ArcParams { x, y, ..*a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_zoom() {
        let offset = PixelOffset::for_zoom(2.0);
        assert_eq!(offset, PixelOffset::new(-0.15, -0.15));
        let (x, y) = offset.apply(10.0, 20.0);
        assert!((x - 9.85).abs() < 1e-12);
        assert!((y - 19.85).abs() < 1e-12);
    }

    #[test]
    fn test_rect_keeps_size() {
        let r = PixelOffset::new(1.0, 2.0).rect(&RectParams::new(0.0, 0.0, 5.0, 6.0));
        assert_eq!(r, RectParams::new(1.0, 2.0, 5.0, 6.0));
    }

    #[test]
    fn test_normalized_flips_negative_size() {
        let r = RectParams::new(15.0, 15.0, -10.0, -4.0).normalized();
        assert_eq!(r, RectParams::new(5.0, 11.0, 10.0, 4.0));
        let r = RectParams::new(1.0, 2.0, 3.0, -2.0).normalized();
        assert_eq!(r, RectParams::new(1.0, 0.0, 3.0, 2.0));
    }
}
