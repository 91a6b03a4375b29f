//! Path building operations for CanvasContext.

use super::{CanvasContext, PathMode};
use crate::error::Canvas2dResult;
use crate::geometry::{ArcParams, CubicBezierParams, QuadraticBezierParams, RectParams};
use crate::surface::NativeSurface;

impl<S: NativeSurface> CanvasContext<S> {
    /// Open a new path.
    pub fn begin_path(&mut self) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "beginPath");
        if self.in_path && self.options.path_mode == PathMode::Strict {
            return Err(Self::violation("beginPath() called while a path is open"));
        }
        self.surface.begin_path();
        self.in_path = true;
        Ok(())
    }

    /// Check that a segment may be added, opening a path in lenient mode.
    fn require_open_path(&mut self, op: &str) -> Canvas2dResult<()> {
        if self.in_path {
            return Ok(());
        }
        match self.options.path_mode {
            PathMode::Strict => Err(Self::violation(format!(
                "{op}() called without beginPath()"
            ))),
            PathMode::Lenient => {
                log::debug!(target: "canvas", "{} opened a path implicitly", op);
                self.surface.begin_path();
                self.in_path = true;
                Ok(())
            }
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        self.require_open_path("moveTo")?;
        let (x, y) = self.options.path_offset.apply(x, y);
        self.surface.move_to(x, y);
        Ok(())
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        self.require_open_path("lineTo")?;
        let (x, y) = self.options.path_offset.apply(x, y);
        self.surface.line_to(x, y);
        Ok(())
    }

    pub fn bezier_curve_to(&mut self, params: &CubicBezierParams) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "bezierCurveTo {:?}", params);
        self.require_open_path("bezierCurveTo")?;
        let params = self.options.path_offset.cubic(params);
        self.surface.bezier_curve_to(&params);
        Ok(())
    }

    pub fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "quadraticCurveTo {:?}", params);
        self.require_open_path("quadraticCurveTo")?;
        let params = self.options.path_offset.quadratic(params);
        self.surface.quadratic_curve_to(&params);
        Ok(())
    }

    pub fn rect(&mut self, params: &RectParams) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "rect {:?}", params);
        self.require_open_path("rect")?;
        let params = self.options.path_offset.rect(params);
        self.surface.rect(&params);
        Ok(())
    }

    pub fn arc(&mut self, params: &ArcParams) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "arc {:?}", params);
        self.require_open_path("arc")?;
        let params = self.options.path_offset.arc(params);
        self.surface.arc(&params);
        Ok(())
    }

    /// Does nothing: the surface closes subpaths implicitly when painting.
    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::super::{ContextOptions, Palette, PathMode};
    use crate::error::Canvas2dError;
    use crate::geometry::{
        ArcParams, CubicBezierParams, PixelOffset, QuadraticBezierParams, RectParams,
    };
    use crate::surface::SurfaceCall;

    #[test]
    fn test_segments_require_open_path() {
        let mut ctx = context(Palette::default(), ContextOptions::default());
        assert!(matches!(
            ctx.move_to(0.0, 0.0),
            Err(Canvas2dError::InvariantViolation(_))
        ));
        assert!(matches!(
            ctx.rect(&RectParams::new(0.0, 0.0, 1.0, 1.0)),
            Err(Canvas2dError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_double_begin_path_is_violation() {
        let mut ctx = context(Palette::default(), ContextOptions::default());
        ctx.begin_path().unwrap();
        let err = ctx.begin_path().unwrap_err();
        assert!(err.to_string().starts_with("Assertion failed:"));
        assert!(ctx.in_path());
    }

    #[test]
    fn test_offset_applied_to_segments() {
        let options = ContextOptions {
            path_offset: PixelOffset::for_zoom(1.0),
            ..ContextOptions::default()
        };
        let mut ctx = context(Palette::default(), options);
        ctx.begin_path().unwrap();
        ctx.move_to(10.0, 20.0).unwrap();
        ctx.arc(&ArcParams {
            x: 5.0,
            y: 5.0,
            radius: 2.0,
            start_angle: 0.0,
            end_angle: 1.0,
            anticlockwise: false,
        })
        .unwrap();

        let calls = ctx.surface_mut().take_calls();
        assert_eq!(calls[1], SurfaceCall::BeginPath);
        match calls[2] {
            SurfaceCall::MoveTo { x, y } => {
                assert!((x - 9.7).abs() < 1e-12);
                assert!((y - 19.7).abs() < 1e-12);
            }
            ref other => panic!("unexpected call {other:?}"),
        }
        match &calls[3] {
            SurfaceCall::Arc(arc) => {
                assert!((arc.x - 4.7).abs() < 1e-12);
                assert_eq!(arc.radius, 2.0);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_offset_applied_to_curves_and_rects() {
        let options = ContextOptions {
            path_offset: PixelOffset::for_zoom(2.0),
            ..ContextOptions::default()
        };
        let mut ctx = context(Palette::default(), options);
        ctx.begin_path().unwrap();
        ctx.rect(&RectParams::new(10.0, 10.0, 4.0, 2.0)).unwrap();
        ctx.bezier_curve_to(&CubicBezierParams {
            cp1x: 1.0,
            cp1y: 2.0,
            cp2x: 3.0,
            cp2y: 4.0,
            x: 5.0,
            y: 6.0,
        })
        .unwrap();
        ctx.quadratic_curve_to(&QuadraticBezierParams {
            cpx: 7.0,
            cpy: 8.0,
            x: 9.0,
            y: 10.0,
        })
        .unwrap();
        ctx.fill_text("a", 30.0, 40.0);

        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        let calls = ctx.surface_mut().take_calls();
        match &calls[2] {
            SurfaceCall::Rect(r) => {
                assert!(close(r.x, 9.85) && close(r.y, 9.85));
                assert_eq!((r.width, r.height), (4.0, 2.0));
            }
            other => panic!("unexpected call {other:?}"),
        }
        match &calls[3] {
            SurfaceCall::BezierCurveTo(c) => {
                assert!(close(c.cp1x, 0.85) && close(c.cp1y, 1.85));
                assert!(close(c.cp2x, 2.85) && close(c.cp2y, 3.85));
                assert!(close(c.x, 4.85) && close(c.y, 5.85));
            }
            other => panic!("unexpected call {other:?}"),
        }
        match &calls[4] {
            SurfaceCall::QuadraticCurveTo(q) => {
                assert!(close(q.cpx, 6.85) && close(q.cpy, 7.85));
                assert!(close(q.x, 8.85) && close(q.y, 9.85));
            }
            other => panic!("unexpected call {other:?}"),
        }
        match &calls[5] {
            SurfaceCall::FillText { x, y, .. } => assert_eq!((*x, *y), (30.0, 40.0)),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_lenient_opens_path_implicitly() {
        let options = ContextOptions {
            path_mode: PathMode::Lenient,
            ..ContextOptions::default()
        };
        let mut ctx = context(Palette::default(), options);
        ctx.line_to(1.0, 1.0).unwrap();
        assert!(ctx.in_path());
        ctx.begin_path().unwrap();
        assert!(ctx.in_path());
    }

    #[test]
    fn test_close_path_is_noop() {
        let mut ctx = context(Palette::default(), ContextOptions::default());
        ctx.begin_path().unwrap();
        let before = ctx.surface().calls().len();
        ctx.close_path();
        assert_eq!(ctx.surface().calls().len(), before);
        assert!(ctx.in_path());
    }
}
