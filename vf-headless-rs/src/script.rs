//! Draw scripts: a JSON rendition of the call stream a rendering library makes.
//!
//! ```json
//! {
//!   "width": 300, "height": 120, "background": "#fff",
//!   "commands": [
//!     {"op": "module", "name": "Stave"},
//!     {"op": "test", "name": "Draw", "commands": [
//!       {"op": "beginPath"},
//!       {"op": "moveTo", "x": 10, "y": 40},
//!       {"op": "lineTo", "x": 290, "y": 40},
//!       {"op": "stroke"}
//!     ]}
//!   ]
//! }
//! ```

use crate::clone::structured_clone;
use crate::console::ConsoleLevel;
use crate::dom::Element;
use crate::error::{HostError, HostResult};
use crate::factory::{FactoryOptions, HeadlessFactory, TEST_CANVAS_SIZE};
use crate::harness::{finish_test, Assert};
use crate::host::HostEnvironment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use vf_headless_canvas2d::{
    ArcParams, CubicBezierParams, DOMMatrix, NativeSurface, QuadraticBezierParams, RectParams,
    SurfaceFactory, TextMetrics,
};

/// Music font named in per-test image file names.
pub const DEFAULT_MUSIC_FONT: &str = "Bravura";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawScript {
    #[serde(flatten)]
    pub options: FactoryOptions,
    #[serde(default)]
    pub commands: Vec<DrawCommand>,
}

impl DrawScript {
    pub fn from_json(text: &str) -> HostResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Size of a canvas a test draws on instead of the script's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCanvas {
    pub width: u32,
    pub height: u32,
}

impl Default for TestCanvas {
    fn default() -> Self {
        Self {
            width: TEST_CANVAS_SIZE.0,
            height: TEST_CANVAS_SIZE.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertMethod {
    Ok,
    NotOk,
    Equal,
    NotEqual,
    StrictEqual,
    NotStrictEqual,
    DeepEqual,
    NotDeepEqual,
    PropEqual,
}

/// Context state readable by `assertState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateProperty {
    Font,
    FillStyle,
    StrokeStyle,
    LineWidth,
    InPath,
    StackDepth,
    /// `[a, b, c, d, e, f]`
    Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    BezierCurveTo {
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    },
    QuadraticCurveTo {
        cpx: f64,
        cpy: f64,
        x: f64,
        y: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    #[serde(rename_all = "camelCase")]
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        #[serde(default)]
        anticlockwise: bool,
    },
    ClosePath,
    Fill,
    Stroke,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
    },
    /// Measure `text` and optionally store the metrics in `window[store]`.
    MeasureText {
        text: Option<String>,
        store: Option<String>,
    },
    Save,
    Restore,
    Scale {
        x: f64,
        y: f64,
    },
    Translate {
        x: f64,
        y: f64,
    },
    Rotate {
        angle: f64,
    },
    SetTransform {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
    SetLineDash {
        segments: Vec<f64>,
    },
    SetFillStyle {
        style: String,
    },
    SetStrokeStyle {
        style: String,
    },
    SetLineWidth {
        width: f64,
    },
    SetFont {
        font: String,
    },

    Log {
        #[serde(default)]
        level: ConsoleLevel,
        message: String,
    },
    /// Assign `font` to a fresh span's style and read it back. `size` (points) is
    /// assigned to `style.fontSize` afterwards.
    ProbeFont {
        font: String,
        size: Option<f64>,
        store: Option<String>,
    },
    CreateElement {
        tag: String,
    },
    GetElementById {
        id: String,
    },
    SetWindow {
        key: String,
        value: Value,
    },
    /// `delete window[key]`
    DeleteWindow {
        key: String,
    },
    /// `window[to] = structuredClone(window[from])`
    StructuredClone {
        from: String,
        to: String,
    },
    Module {
        name: String,
    },
    Test {
        name: String,
        canvas: Option<TestCanvas>,
        #[serde(default)]
        commands: Vec<DrawCommand>,
    },
    Expect {
        count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Assert {
        method: AssertMethod,
        #[serde(default)]
        actual: Value,
        /// Read the actual value from `window` instead.
        from_window: Option<String>,
        #[serde(default)]
        expected: Value,
        message: Option<String>,
    },
    /// Passes when the nested commands fail.
    Throws {
        #[serde(default)]
        commands: Vec<DrawCommand>,
        message: Option<String>,
    },
    AssertState {
        property: StateProperty,
        expected: Value,
        message: Option<String>,
    },
}

/// `rust_<module>.<test>.<font>.png`, with every non-alphanumeric character of the
/// module and test names replaced by `_`.
pub fn image_file_name(module: &str, test: &str, music_font: &str) -> String {
    fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
    format!("rust_{}.{}.{}.png", sanitize(module), sanitize(test), music_font)
}

fn metrics_value(metrics: &TextMetrics) -> Value {
    json!({
        "width": metrics.width,
        "fontBoundingBoxAscent": metrics.font_bounding_box_ascent,
        "fontBoundingBoxDescent": metrics.font_bounding_box_descent,
        "actualBoundingBoxAscent": metrics.actual_bounding_box_ascent,
        "actualBoundingBoxDescent": metrics.actual_bounding_box_descent,
    })
}

fn matrix_value(matrix: &DOMMatrix) -> Value {
    json!([matrix.a, matrix.b, matrix.c, matrix.d, matrix.e, matrix.f])
}

/// Runs draw commands against one host and one main canvas.
pub struct ScriptExecutor<'h, F: SurfaceFactory> {
    host: &'h mut HostEnvironment<F>,
    factory: HeadlessFactory<F::Surface>,
    image_dir: Option<PathBuf>,
    music_font: String,
}

impl<'h, F: SurfaceFactory> ScriptExecutor<'h, F> {
    /// Build the main canvas from `options`.
    pub fn new(host: &'h mut HostEnvironment<F>, options: FactoryOptions) -> HostResult<Self> {
        let factory = HeadlessFactory::new(host.surfaces(), options)?;
        Ok(Self {
            host,
            factory,
            image_dir: None,
            music_font: DEFAULT_MUSIC_FONT.to_string(),
        })
    }

    /// Save the canvas of every test that declares one into `dir`.
    pub fn with_image_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.image_dir = dir;
        self
    }

    pub fn with_music_font(mut self, font: impl Into<String>) -> Self {
        self.music_font = font.into();
        self
    }

    pub fn factory(&mut self) -> &mut HeadlessFactory<F::Surface> {
        &mut self.factory
    }

    pub fn into_factory(self) -> HeadlessFactory<F::Surface> {
        self.factory
    }

    /// Execute `commands` in order, stopping at the first error.
    pub fn run(&mut self, commands: &[DrawCommand]) -> HostResult<()> {
        for command in commands {
            self.execute(command)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: &DrawCommand) -> HostResult<()> {
        let ctx = self.factory.context();
        match command {
            DrawCommand::BeginPath => ctx.begin_path()?,
            DrawCommand::MoveTo { x, y } => ctx.move_to(*x, *y)?,
            DrawCommand::LineTo { x, y } => ctx.line_to(*x, *y)?,
            DrawCommand::BezierCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            } => ctx.bezier_curve_to(&CubicBezierParams {
                cp1x: *cp1x,
                cp1y: *cp1y,
                cp2x: *cp2x,
                cp2y: *cp2y,
                x: *x,
                y: *y,
            })?,
            DrawCommand::QuadraticCurveTo { cpx, cpy, x, y } => {
                ctx.quadratic_curve_to(&QuadraticBezierParams {
                    cpx: *cpx,
                    cpy: *cpy,
                    x: *x,
                    y: *y,
                })?
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
            } => ctx.rect(&RectParams::new(*x, *y, *width, *height))?,
            DrawCommand::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
                anticlockwise,
            } => ctx.arc(&ArcParams {
                x: *x,
                y: *y,
                radius: *radius,
                start_angle: *start_angle,
                end_angle: *end_angle,
                anticlockwise: *anticlockwise,
            })?,
            DrawCommand::ClosePath => ctx.close_path(),
            DrawCommand::Fill => ctx.fill()?,
            DrawCommand::Stroke => ctx.stroke()?,
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
            } => ctx.fill_rect(&RectParams::new(*x, *y, *width, *height)),
            DrawCommand::ClearRect {
                x,
                y,
                width,
                height,
            } => ctx.clear_rect(&RectParams::new(*x, *y, *width, *height)),
            DrawCommand::FillText { text, x, y } => ctx.fill_text(text, *x, *y),
            DrawCommand::MeasureText { text, store } => {
                let metrics = metrics_value(&ctx.measure_text(text.as_deref()));
                self.host
                    .console
                    .debug(&format!("measureText({text:?}) = {metrics}"));
                if let Some(key) = store {
                    self.host.window.set(key.clone(), metrics);
                }
            }
            DrawCommand::Save => ctx.save(),
            DrawCommand::Restore => ctx.restore(),
            DrawCommand::Scale { x, y } => ctx.scale(*x, *y),
            DrawCommand::Translate { x, y } => ctx.translate(*x, *y),
            DrawCommand::Rotate { angle } => ctx.rotate(*angle),
            DrawCommand::SetTransform { a, b, c, d, e, f } => {
                ctx.set_transform(DOMMatrix::new(*a, *b, *c, *d, *e, *f))
            }
            DrawCommand::SetLineDash { segments } => ctx.set_line_dash(segments),
            DrawCommand::SetFillStyle { style } => ctx.set_fill_style(style)?,
            DrawCommand::SetStrokeStyle { style } => ctx.set_stroke_style(style)?,
            DrawCommand::SetLineWidth { width } => ctx.set_line_width(*width),
            DrawCommand::SetFont { font } => ctx.set_font(font)?,

            DrawCommand::Log { level, message } => self.host.console.write(*level, message),
            DrawCommand::ProbeFont { font, size, store } => {
                self.probe_font(font, *size, store.as_deref())?
            }
            DrawCommand::CreateElement { tag } => {
                let element = self.host.document.create_element(tag)?;
                log::debug!(target: "host", "created <{}>", element.tag_name());
            }
            DrawCommand::GetElementById { id } => {
                let canvas = self.host.document.get_element_by_id(id)?;
                log::debug!(
                    target: "host",
                    "element '{id}' is a {}x{} canvas",
                    canvas.width(),
                    canvas.height()
                );
            }
            DrawCommand::SetWindow { key, value } => {
                self.host.window.set(key.clone(), value.clone());
            }
            DrawCommand::DeleteWindow { key } => {
                if self.host.window.remove(key).is_none() {
                    log::debug!(target: "host", "window.{key} was not set");
                }
            }
            DrawCommand::StructuredClone { from, to } => {
                let value = self.host.window.get(from).cloned().unwrap_or(Value::Null);
                let copy = structured_clone(&value)?;
                self.host.window.set(to.clone(), copy);
            }
            DrawCommand::Module { name } => self.host.harness.module(name),
            DrawCommand::Test {
                name,
                canvas,
                commands,
            } => self.run_test(name, canvas.as_ref(), commands)?,
            DrawCommand::Expect { count } => self.host.harness.expect(*count),
            DrawCommand::Assert {
                method,
                actual,
                from_window,
                expected,
                message,
            } => {
                let actual = match from_window {
                    Some(key) => self.host.window.get(key).cloned().unwrap_or(Value::Null),
                    None => actual.clone(),
                };
                self.assert(*method, &actual, expected, message.as_deref());
            }
            DrawCommand::Throws { commands, message } => {
                let raised = match self.run(commands) {
                    Ok(()) => false,
                    Err(err) => {
                        log::debug!(target: "host", "throws: caught {err}");
                        true
                    }
                };
                self.host.harness.throws(raised, message.as_deref());
            }
            DrawCommand::AssertState {
                property,
                expected,
                message,
            } => {
                let actual = self.state_value(*property);
                self.host
                    .harness
                    .deep_equal(&actual, expected, message.as_deref());
            }
        }
        Ok(())
    }

    fn assert(&mut self, method: AssertMethod, actual: &Value, expected: &Value, message: Option<&str>) {
        let harness = self.host.harness.as_mut();
        match method {
            AssertMethod::Ok => harness.ok(actual, message),
            AssertMethod::NotOk => harness.not_ok(actual, message),
            AssertMethod::Equal => harness.equal(actual, expected, message),
            AssertMethod::NotEqual => harness.not_equal(actual, expected, message),
            AssertMethod::StrictEqual => harness.strict_equal(actual, expected, message),
            AssertMethod::NotStrictEqual => harness.not_strict_equal(actual, expected, message),
            AssertMethod::DeepEqual => harness.deep_equal(actual, expected, message),
            AssertMethod::NotDeepEqual => harness.not_deep_equal(actual, expected, message),
            AssertMethod::PropEqual => harness.prop_equal(actual, expected, message),
        }
    }

    fn state_value(&mut self, property: StateProperty) -> Value {
        let ctx = self.factory.context();
        match property {
            StateProperty::Font => json!(ctx.font()),
            StateProperty::FillStyle => json!(ctx.fill_style()),
            StateProperty::StrokeStyle => json!(ctx.stroke_style()),
            StateProperty::LineWidth => json!(ctx.line_width()),
            StateProperty::InPath => json!(ctx.in_path()),
            StateProperty::StackDepth => json!(ctx.stack_depth()),
            StateProperty::Transform => matrix_value(&ctx.get_transform()),
        }
    }

    fn probe_font(
        &mut self,
        font: &str,
        size: Option<f64>,
        store: Option<&str>,
    ) -> HostResult<()> {
        let mut span = match self.host.document.create_element("span")? {
            Element::Span(span) => span,
            other => return Err(HostError::UnsupportedElement(other.tag_name().to_string())),
        };
        span.style.set_raw(font)?;
        if let Some(size) = size {
            span.style.set_font_size(size);
        }
        let parsed = span.style.parsed();
        let value = json!({
            "font": span.style.font(),
            "fontFamily": span.style.font_family(),
            "fontSize": span.style.font_size(),
            "bold": parsed.bold,
            "italic": parsed.italic,
        });
        self.host.console.debug(&format!("probeFont({font:?}) = {value}"));
        if let Some(key) = store {
            self.host.window.set(key, value);
        }
        Ok(())
    }

    fn run_test(
        &mut self,
        name: &str,
        canvas: Option<&TestCanvas>,
        commands: &[DrawCommand],
    ) -> HostResult<()> {
        self.host.harness.begin_test(name);
        let body = match canvas {
            Some(size) => self.run_on_test_canvas(name, size, commands),
            None => self.run(commands),
        };
        finish_test(
            self.host.harness.as_mut(),
            self.host.console.as_ref(),
            name,
            body,
        )?;
        Ok(())
    }

    /// Run `commands` on a fresh canvas of `size`, then save it if an image directory is
    /// set.
    fn run_on_test_canvas(
        &mut self,
        name: &str,
        size: &TestCanvas,
        commands: &[DrawCommand],
    ) -> HostResult<()> {
        let options = self
            .factory
            .options()
            .clone()
            .with_size(size.width, size.height);
        let test_factory = HeadlessFactory::new(self.host.surfaces(), options)?;
        let main = std::mem::replace(&mut self.factory, test_factory);
        let result = self.run(commands);
        let test_factory = std::mem::replace(&mut self.factory, main);
        result?;

        if let Some(dir) = &self.image_dir {
            let file = image_file_name(self.host.harness.current_module(), name, &self.music_font);
            save_test_image(&test_factory, &dir.join(file))?;
        }
        Ok(())
    }
}

fn save_test_image<S: NativeSurface>(
    factory: &HeadlessFactory<S>,
    path: &Path,
) -> HostResult<()> {
    factory.save_file(path)?;
    log::debug!(target: "host", "saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemoryConsole;
    use crate::host::{HarnessMode, HostOptions};
    use vf_headless_canvas2d::{RecordingSurfaceFactory, SurfaceCall};

    fn host(mode: HarnessMode) -> (HostEnvironment<RecordingSurfaceFactory>, MemoryConsole) {
        let console = MemoryConsole::new();
        let host = HostEnvironment::with_console(
            RecordingSurfaceFactory,
            &HostOptions::default().with_harness(mode),
            Box::new(console.clone()),
        );
        (host, console)
    }

    fn script(text: &str) -> DrawScript {
        DrawScript::from_json(text).unwrap()
    }

    #[test]
    fn test_parse_script() {
        let script = script(
            r#"{
                "width": 300,
                "zoom": 2,
                "commands": [
                    {"op": "beginPath"},
                    {"op": "arc", "x": 1, "y": 2, "radius": 3, "startAngle": 0, "endAngle": 1},
                    {"op": "setFillStyle", "style": "red"},
                    {"op": "test", "name": "t", "canvas": {"width": 100}}
                ]
            }"#,
        );
        assert_eq!(script.options.width, 300);
        assert_eq!(script.options.zoom, 2.0);
        assert_eq!(script.options.height, 200);
        assert_eq!(script.commands[0], DrawCommand::BeginPath);
        assert!(matches!(
            script.commands[1],
            DrawCommand::Arc {
                anticlockwise: false,
                ..
            }
        ));
        assert_eq!(
            script.commands[3],
            DrawCommand::Test {
                name: "t".to_string(),
                canvas: Some(TestCanvas {
                    width: 100,
                    height: 140
                }),
                commands: vec![],
            }
        );
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(DrawScript::from_json(r#"{"commands": [{"op": "drawImage"}]}"#).is_err());
    }

    #[test]
    fn test_commands_reach_surface() {
        let (mut host, _) = host(HarnessMode::Strict);
        let script = script(
            r#"{"width": 50, "height": 20, "commands": [
                {"op": "setFont", "font": "10pt Bravura"},
                {"op": "fillText", "text": "ab", "x": 5, "y": 10},
                {"op": "fillRect", "x": 0, "y": 0, "width": 5, "height": 5}
            ]}"#,
        );
        let mut executor = ScriptExecutor::new(&mut host, script.options.clone()).unwrap();
        executor.run(&script.commands).unwrap();
        let calls = executor.factory().context().surface().calls().to_vec();
        assert!(calls
            .iter()
            .any(|call| matches!(call, SurfaceCall::FillText { text, .. } if text == "ab")));
        assert!(matches!(calls.last(), Some(SurfaceCall::FillRect { .. })));
    }

    #[test]
    fn test_state_assertions() {
        let (mut host, console) = host(HarnessMode::Strict);
        let script = script(
            r##"{"commands": [
                {"op": "module", "name": "Context"},
                {"op": "test", "name": "State", "commands": [
                    {"op": "expect", "count": 4},
                    {"op": "save"},
                    {"op": "setFillStyle", "style": "#f00"},
                    {"op": "assertState", "property": "stackDepth", "expected": 1},
                    {"op": "restore"},
                    {"op": "assertState", "property": "fillStyle", "expected": "#111111ff"},
                    {"op": "beginPath"},
                    {"op": "assertState", "property": "inPath", "expected": true},
                    {"op": "assertState", "property": "transform", "expected": [1, 0, 0, 1, 0, 0]}
                ]}
            ]}"##,
        );
        let mut executor = ScriptExecutor::new(&mut host, script.options.clone()).unwrap();
        executor.run(&script.commands).unwrap();
        drop(executor);
        assert!(host.harness.summary().is_success());
        assert!(console.contains("test Context::State ... ok"));
    }

    #[test]
    fn test_throws_and_window_assertions() {
        let (mut host, _) = host(HarnessMode::Strict);
        let script = script(
            r#"{"commands": [
                {"op": "test", "name": "Errors", "commands": [
                    {"op": "throws", "commands": [{"op": "stroke"}]},
                    {"op": "throws", "commands": [{"op": "createElement", "tag": "div"}]},
                    {"op": "measureText", "text": "abc", "store": "m"},
                    {"op": "assert", "method": "ok", "fromWindow": "m"},
                    {"op": "probeFont", "font": "bold 12px Academico", "store": "f"},
                    {"op": "structuredClone", "from": "f", "to": "g"},
                    {"op": "assert", "method": "deepEqual", "fromWindow": "g",
                     "expected": {"font": "bold 9pt Academico", "fontFamily": "Academico",
                                  "fontSize": "9pt", "bold": true, "italic": false}}
                ]}
            ]}"#,
        );
        let mut executor = ScriptExecutor::new(&mut host, script.options.clone()).unwrap();
        executor.run(&script.commands).unwrap();
        drop(executor);
        let summary = host.harness.summary();
        assert!(summary.is_success(), "{:?}", summary.failures);
        // Three codepoints of the default 10px font at 0.6em each.
        let width = host.window.get("m").unwrap()["width"].as_f64().unwrap();
        assert!((width - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_font_size_override() {
        let (mut host, _) = host(HarnessMode::Strict);
        let script = script(
            r#"{"commands": [
                {"op": "probeFont", "font": "italic 12px Academico", "size": 16, "store": "f"}
            ]}"#,
        );
        let mut executor = ScriptExecutor::new(&mut host, script.options.clone()).unwrap();
        executor.run(&script.commands).unwrap();
        drop(executor);
        let probed = host.window.get("f").unwrap();
        assert_eq!(probed["font"], "italic 16pt Academico");
        assert_eq!(probed["fontSize"], "16pt");
    }

    #[test]
    fn test_failed_assertion_is_recorded() {
        let (mut host, console) = host(HarnessMode::Strict);
        let commands = vec![
            DrawCommand::Module {
                name: "M".to_string(),
            },
            DrawCommand::Test {
                name: "T".to_string(),
                canvas: None,
                commands: vec![DrawCommand::Assert {
                    method: AssertMethod::Equal,
                    actual: json!(1),
                    from_window: None,
                    expected: json!(2),
                    message: None,
                }],
            },
        ];
        let mut executor = ScriptExecutor::new(&mut host, FactoryOptions::default()).unwrap();
        executor.run(&commands).unwrap();
        drop(executor);
        assert_eq!(host.harness.summary().failed, 1);
        assert!(console.contains("test M::T ... FAILED"));
    }

    #[test]
    fn test_test_canvas_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (mut host, _) = host(HarnessMode::PassThrough);
        let script = script(
            r#"{"commands": [
                {"op": "module", "name": "Stave Line"},
                {"op": "test", "name": "Draw #1", "canvas": {}, "commands": [
                    {"op": "fillRect", "x": 0, "y": 0, "width": 5, "height": 5}
                ]}
            ]}"#,
        );
        let mut executor = ScriptExecutor::new(&mut host, script.options.clone())
            .unwrap()
            .with_image_dir(Some(dir.path().to_path_buf()));
        executor.run(&script.commands).unwrap();

        // The main canvas is untouched.
        assert_eq!(executor.factory().context().surface().calls().len(), 1);
        let image = dir.path().join("rust_Stave_Line.Draw__1.Bravura.png");
        assert!(image.exists());
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(
            image_file_name("Tab Note", "Draw Beam (up)", "Petaluma"),
            "rust_Tab_Note.Draw_Beam__up_.Petaluma.png"
        );
    }
}
