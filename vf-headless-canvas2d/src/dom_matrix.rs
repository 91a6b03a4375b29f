//! DOMMatrix type for 2D transformation matrices.

/// DOMMatrix represents a 2D transformation matrix.
///
/// The matrix is represented as:
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DOMMatrix {
    /// Scale X component.
    pub a: f64,
    /// Skew Y component.
    pub b: f64,
    /// Skew X component.
    pub c: f64,
    /// Scale Y component.
    pub d: f64,
    /// Translate X component.
    pub e: f64,
    /// Translate Y component.
    pub f: f64,
}

impl DOMMatrix {
    pub const IDENTITY: DOMMatrix = DOMMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// `self * other`: `other` is applied to points first.
    pub fn multiply(&self, other: &DOMMatrix) -> DOMMatrix {
        DOMMatrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(&self, tx: f64, ty: f64) -> DOMMatrix {
        self.multiply(&DOMMatrix::new(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    pub fn scale(&self, sx: f64, sy: f64) -> DOMMatrix {
        self.multiply(&DOMMatrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotate by `angle` radians, clockwise on a y-down surface.
    pub fn rotate(&self, angle: f64) -> DOMMatrix {
        let (sin, cos) = angle.sin_cos();
        self.multiply(&DOMMatrix::new(cos, sin, -sin, cos, 0.0, 0.0))
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for DOMMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<tiny_skia::Transform> for DOMMatrix {
    fn from(t: tiny_skia::Transform) -> Self {
        DOMMatrix {
            a: t.sx as f64,
            b: t.ky as f64,
            c: t.kx as f64,
            d: t.sy as f64,
            e: t.tx as f64,
            f: t.ty as f64,
        }
    }
}

impl From<DOMMatrix> for tiny_skia::Transform {
    fn from(m: DOMMatrix) -> Self {
        tiny_skia::Transform::from_row(
            m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_then_scale() {
        let m = DOMMatrix::identity().translate(10.0, 20.0).scale(2.0, 3.0);
        assert_eq!(m.transform_point(1.0, 1.0), (12.0, 23.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let m = DOMMatrix::identity().rotate(std::f64::consts::FRAC_PI_2);
        let (x, y) = m.transform_point(1.0, 0.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_skia_round_trip() {
        let m = DOMMatrix::new(2.0, 0.5, 0.25, 3.0, 4.0, 5.0);
        let t: tiny_skia::Transform = m.into();
        assert_eq!(t.sx, 2.0);
        assert_eq!(t.ky, 0.5);
        assert_eq!(t.kx, 0.25);
        assert_eq!(DOMMatrix::from(t), m);
    }
}
