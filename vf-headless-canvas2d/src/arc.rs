//! Arc operations using bezier curve approximation.
//!
//! tiny-skia does not support arc primitives directly, so we approximate
//! arcs using cubic bezier curves of at most a quarter turn each.

use crate::geometry::{ArcParams, CubicBezierParams};
use std::f64::consts::{FRAC_PI_2, TAU};

/// An arc flattened to cubic segments, in the same space as its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcCurves {
    /// First point on the arc. Connected to the current point with a line, or moved to
    /// when the path is empty.
    pub start: (f64, f64),
    pub segments: Vec<CubicBezierParams>,
}

/// Approximate a circular arc with cubic bezier curves.
///
/// Returns `None` for a negative or non-finite radius. A zero sweep yields only the
/// start point.
pub fn arc_to_cubics(params: &ArcParams) -> Option<ArcCurves> {
    let ArcParams {
        x,
        y,
        radius,
        start_angle,
        end_angle,
        anticlockwise,
    } = *params;
    if !(radius.is_finite() && radius >= 0.0) {
        return None;
    }

    let sweep = normalize_sweep(end_angle - start_angle, anticlockwise);
    let point = |angle: f64| (x + radius * angle.cos(), y + radius * angle.sin());

    let num_segments = (sweep.abs() / FRAC_PI_2).ceil() as usize;
    let segment_angle = if num_segments == 0 {
        0.0
    } else {
        sweep / num_segments as f64
    };
    // Control point factor for one segment.
    let k = 4.0 / 3.0 * (segment_angle / 4.0).tan();

    let segments = (0..num_segments)
        .map(|i| {
            let a1 = start_angle + i as f64 * segment_angle;
            let a2 = a1 + segment_angle;
            let (x1, y1) = point(a1);
            let (x2, y2) = point(a2);
            CubicBezierParams {
                cp1x: x1 - k * radius * a1.sin(),
                cp1y: y1 + k * radius * a1.cos(),
                cp2x: x2 + k * radius * a2.sin(),
                cp2y: y2 - k * radius * a2.cos(),
                x: x2,
                y: y2,
            }
        })
        .collect();

    Some(ArcCurves {
        start: point(start_angle),
        segments,
    })
}

/// Clamp the sweep to one full turn and give it the sign of the drawing direction.
fn normalize_sweep(delta: f64, anticlockwise: bool) -> f64 {
    if !delta.is_finite() {
        return 0.0;
    }
    if anticlockwise {
        if delta <= -TAU {
            -TAU
        } else {
            let mut sweep = delta % TAU;
            if sweep > 0.0 {
                sweep -= TAU;
            }
            sweep
        }
    } else if delta >= TAU {
        TAU
    } else {
        let mut sweep = delta % TAU;
        if sweep < 0.0 {
            sweep += TAU;
        }
        sweep
    }
}
