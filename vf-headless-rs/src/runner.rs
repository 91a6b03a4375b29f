//! Loading and running draw scripts, with the outermost error boundary.

use crate::factory::{FactoryOptions, PathModeSetting};
use crate::harness::TestSummary;
use crate::host::HostEnvironment;
use crate::script::{DrawScript, ScriptExecutor, DEFAULT_MUSIC_FONT};
use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use vf_headless_canvas2d::SurfaceFactory;

/// Command-line values that take precedence over the script's own options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptOverrides {
    pub zoom: Option<f64>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub force_foreground: Option<bool>,
    pub path_mode: Option<PathModeSetting>,
}

impl ScriptOverrides {
    pub fn apply(&self, options: &mut FactoryOptions) {
        if let Some(zoom) = self.zoom {
            options.zoom = zoom;
        }
        if let Some(background) = &self.background {
            options.background = background.clone();
        }
        if let Some(foreground) = &self.foreground {
            options.foreground = foreground.clone();
        }
        if let Some(force) = self.force_foreground {
            options.force_foreground = force;
        }
        if let Some(mode) = self.path_mode {
            options.path_mode = mode;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Where the main canvas is written. Nothing is written when the run fails.
    pub output: Option<PathBuf>,
    /// Directory for the canvases of tests that declare their own.
    pub image_dir: Option<PathBuf>,
    pub music_font: String,
    pub overrides: ScriptOverrides,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output: None,
            image_dir: None,
            music_font: DEFAULT_MUSIC_FONT.to_string(),
            overrides: ScriptOverrides::default(),
        }
    }
}

impl RunOptions {
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ScriptOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Result of one run, as seen from outside the error boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub error: Option<String>,
    pub output: Option<PathBuf>,
    pub summary: TestSummary,
    /// `window` properties at the end of the run.
    pub window: Value,
}

pub async fn load_script(path: &Path) -> anyhow::Result<DrawScript> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read draw script {}", path.display()))?;
    let script = DrawScript::from_json(&text)
        .with_context(|| format!("Failed to parse draw script {}", path.display()))?;
    Ok(script)
}

/// Execute `script` and write the main canvas to `options.output`.
///
/// Any failed test under a strict harness fails the run.
pub fn render_script<F: SurfaceFactory>(
    host: &mut HostEnvironment<F>,
    script: &DrawScript,
    options: &RunOptions,
) -> anyhow::Result<Option<PathBuf>> {
    let mut factory_options = script.options.clone();
    options.overrides.apply(&mut factory_options);
    log::info!(
        "Rendering {} commands on a {}x{} canvas at zoom {}",
        script.commands.len(),
        factory_options.width,
        factory_options.height,
        factory_options.zoom
    );

    let mut executor = ScriptExecutor::new(host, factory_options)
        .context("Failed to create the canvas")?
        .with_image_dir(options.image_dir.clone())
        .with_music_font(options.music_font.clone());
    executor.run(&script.commands)?;
    let factory = executor.into_factory();

    let summary = host.harness.summary();
    if !summary.is_success() {
        bail!(
            "{} of {} tests failed:\n{}",
            summary.failed,
            summary.total(),
            summary.failures.join("\n")
        );
    }

    match &options.output {
        Some(path) => {
            factory
                .save_file(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Saved {}", path.display());
            Ok(Some(path.clone()))
        }
        None => Ok(None),
    }
}

/// Run an already loaded script inside the error boundary.
pub fn run_script<F: SurfaceFactory>(
    host: &mut HostEnvironment<F>,
    script: &DrawScript,
    options: &RunOptions,
) -> RunReport {
    let result = render_script(host, script, options);
    report(host, result)
}

/// Load and run the script at `path`. Every failure is caught here, written to the
/// console as `Uncaught exception: ...` with its cause chain, and reported.
pub async fn run_script_file<F: SurfaceFactory>(
    host: &mut HostEnvironment<F>,
    path: &Path,
    options: &RunOptions,
) -> RunReport {
    let result = match load_script(path).await {
        Ok(script) => render_script(host, &script, options),
        Err(err) => Err(err),
    };
    report(host, result)
}

fn report<F: SurfaceFactory>(
    host: &HostEnvironment<F>,
    result: anyhow::Result<Option<PathBuf>>,
) -> RunReport {
    let summary = host.harness.summary();
    let window = host.window.to_value();
    match result {
        Ok(output) => RunReport {
            success: true,
            error: None,
            output,
            summary,
            window,
        },
        Err(err) => {
            host.console
                .error(&format!("Uncaught exception: {err}\n{err:?}"));
            RunReport {
                success: false,
                error: Some(format!("{err:#}")),
                output: None,
                summary,
                window,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleLevel, MemoryConsole};
    use crate::host::{HarnessMode, HostOptions};
    use vf_headless_canvas2d::RecordingSurfaceFactory;

    fn host(mode: HarnessMode) -> (HostEnvironment<RecordingSurfaceFactory>, MemoryConsole) {
        let console = MemoryConsole::new();
        let host = HostEnvironment::with_console(
            RecordingSurfaceFactory,
            &HostOptions::default().with_harness(mode),
            Box::new(console.clone()),
        );
        (host, console)
    }

    #[test]
    fn test_overrides_apply() {
        let mut options = FactoryOptions::default();
        ScriptOverrides {
            zoom: Some(3.0),
            background: Some("#fff".to_string()),
            path_mode: Some(PathModeSetting::Lenient),
            ..ScriptOverrides::default()
        }
        .apply(&mut options);
        assert_eq!(options.zoom, 3.0);
        assert_eq!(options.background, "#fff");
        assert_eq!(options.foreground, "#111");
        assert_eq!(options.path_mode, PathModeSetting::Lenient);
    }

    #[test]
    fn test_failing_script_reports_uncaught_exception() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let (mut host, console) = host(HarnessMode::PassThrough);
        let script = DrawScript::from_json(r#"{"commands": [{"op": "fill"}]}"#).unwrap();
        let report = run_script(&mut host, &script, &RunOptions::default().with_output(&output));

        assert!(!report.success);
        assert_eq!(
            report.error.as_deref(),
            Some("Assertion failed: fill() called without beginPath()")
        );
        let errors = console.messages(ConsoleLevel::Error);
        assert!(errors[0].starts_with("Uncaught exception: Assertion failed"));
        assert!(!output.exists());
    }

    #[test]
    fn test_report_carries_window() {
        let (mut host, _) = host(HarnessMode::PassThrough);
        let script = DrawScript::from_json(
            r#"{"commands": [
                {"op": "setWindow", "key": "a", "value": 1},
                {"op": "setWindow", "key": "b", "value": [true]},
                {"op": "deleteWindow", "key": "a"},
                {"op": "deleteWindow", "key": "missing"}
            ]}"#,
        )
        .unwrap();
        let report = run_script(&mut host, &script, &RunOptions::default());
        assert!(report.success);
        assert_eq!(report.window, serde_json::json!({"b": [true]}));
    }

    #[test]
    fn test_strict_failures_fail_the_run() {
        let (mut host, console) = host(HarnessMode::Strict);
        let script = DrawScript::from_json(
            r#"{"commands": [
                {"op": "module", "name": "M"},
                {"op": "test", "name": "T", "commands": [
                    {"op": "assert", "method": "ok", "actual": false, "message": "nope"}
                ]}
            ]}"#,
        )
        .unwrap();
        let report = run_script(&mut host, &script, &RunOptions::default());
        assert!(!report.success);
        assert_eq!(report.summary.failed, 1);
        assert!(console.contains("M::T: nope"));
    }

    #[tokio::test]
    async fn test_missing_script_file() {
        let (mut host, console) = host(HarnessMode::PassThrough);
        let report = run_script_file(
            &mut host,
            Path::new("/nonexistent/script.json"),
            &RunOptions::default(),
        )
        .await;
        assert!(!report.success);
        assert!(report
            .error
            .unwrap()
            .starts_with("Failed to read draw script"));
        assert!(console.contains("Uncaught exception: Failed to read draw script"));
    }

    #[tokio::test]
    async fn test_run_script_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("script.json");
        std::fs::write(
            &script_path,
            r#"{"width": 10, "height": 10, "commands": [
                {"op": "fillRect", "x": 0, "y": 0, "width": 5, "height": 5}
            ]}"#,
        )
        .unwrap();
        let output = dir.path().join("out").join("image.png");
        let (mut host, _) = host(HarnessMode::Strict);
        let report =
            run_script_file(&mut host, &script_path, &RunOptions::default().with_output(&output))
                .await;

        assert!(report.success, "{:?}", report.error);
        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        assert!(output.exists());
    }
}
