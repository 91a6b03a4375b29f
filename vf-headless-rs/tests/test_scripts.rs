use rstest::rstest;
use std::path::Path;
use vf_headless_canvas2d::{FontConfig, PixmapSurfaceFactory};
use vf_headless_rs::{
    run_script, ConsoleLevel, DrawScript, ElementLookup, HarnessMode, HostEnvironment,
    HostOptions, MemoryConsole, RunOptions, ScriptOverrides,
};

const STAVE_SCRIPT: &str = r##"{
    "width": 120,
    "height": 60,
    "background": "#fff",
    "commands": [
        {"op": "module", "name": "Stave"},
        {"op": "test", "name": "Lines", "commands": [
            {"op": "setStrokeStyle", "style": "#000"},
            {"op": "setLineWidth", "width": 1},
            {"op": "beginPath"},
            {"op": "moveTo", "x": 10, "y": 20},
            {"op": "lineTo", "x": 110, "y": 20},
            {"op": "moveTo", "x": 10, "y": 30},
            {"op": "lineTo", "x": 110, "y": 30},
            {"op": "stroke"},
            {"op": "beginPath"},
            {"op": "arc", "x": 60, "y": 45, "radius": 5, "startAngle": 0, "endAngle": 6.283185307179586},
            {"op": "fill"},
            {"op": "fillRect", "x": 10, "y": 20, "width": 1, "height": 10},
            {"op": "assertState", "property": "inPath", "expected": false}
        ]}
    ]
}"##;

fn host(mode: HarnessMode) -> (HostEnvironment<PixmapSurfaceFactory>, MemoryConsole) {
    let surfaces =
        PixmapSurfaceFactory::from_config(&FontConfig::default().with_system_fonts(false));
    let console = MemoryConsole::new();
    let host = HostEnvironment::with_console(
        surfaces,
        &HostOptions::default().with_harness(mode),
        Box::new(console.clone()),
    );
    (host, console)
}

fn render(script: &str, output: &Path) -> Vec<u8> {
    let (mut host, _) = host(HarnessMode::Strict);
    let script = DrawScript::from_json(script).unwrap();
    let report = run_script(&mut host, &script, &RunOptions::default().with_output(output));
    assert!(report.success, "{:?}", report.error);
    std::fs::read(output).unwrap()
}

#[test]
fn test_render_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = render(STAVE_SCRIPT, &dir.path().join("a.png"));
    let second = render(STAVE_SCRIPT, &dir.path().join("b.png"));
    assert_eq!(&first[1..4], b"PNG");
    assert_eq!(first, second);
}

#[test]
fn test_zoom_override_changes_output() {
    let dir = tempfile::tempdir().unwrap();
    let plain = render(STAVE_SCRIPT, &dir.path().join("plain.png"));

    let (mut host, _) = host(HarnessMode::Strict);
    let script = DrawScript::from_json(STAVE_SCRIPT).unwrap();
    let zoomed_path = dir.path().join("zoomed.png");
    let options = RunOptions::default()
        .with_output(&zoomed_path)
        .with_overrides(ScriptOverrides {
            zoom: Some(2.0),
            ..ScriptOverrides::default()
        });
    assert!(run_script(&mut host, &script, &options).success);
    assert_ne!(std::fs::read(zoomed_path).unwrap(), plain);
}

#[test]
fn test_reports_each_test() {
    let (mut host, console) = host(HarnessMode::Strict);
    let script = DrawScript::from_json(STAVE_SCRIPT).unwrap();
    let report = run_script(&mut host, &script, &RunOptions::default());
    assert!(report.success);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(
        console.messages(ConsoleLevel::Log),
        vec!["test Stave::Lines ... ok"]
    );
}

#[test]
fn test_per_test_images() {
    let dir = tempfile::tempdir().unwrap();
    let (mut host, _) = host(HarnessMode::PassThrough);
    let script = DrawScript::from_json(
        r#"{"commands": [
            {"op": "module", "name": "Bend"},
            {"op": "test", "name": "Double Bends", "canvas": {"width": 60, "height": 40},
             "commands": [{"op": "fillRect", "x": 0, "y": 0, "width": 10, "height": 10}]},
            {"op": "test", "name": "Reverse", "canvas": {}, "commands": []}
        ]}"#,
    )
    .unwrap();
    let options = RunOptions::default().with_image_dir(dir.path());
    assert!(run_script(&mut host, &script, &options).success);
    assert!(dir.path().join("rust_Bend.Double_Bends.Bravura.png").exists());
    assert!(dir.path().join("rust_Bend.Reverse.Bravura.png").exists());
}

#[test]
fn test_element_lookup_is_configurable() {
    let script = DrawScript::from_json(
        r#"{"commands": [{"op": "getElementById", "id": "boo"}]}"#,
    )
    .unwrap();

    let (mut host, console) = host(HarnessMode::PassThrough);
    assert!(!run_script(&mut host, &script, &RunOptions::default()).success);
    assert!(console.contains("Uncaught exception: getElementById('boo')"));

    let surfaces =
        PixmapSurfaceFactory::from_config(&FontConfig::default().with_system_fonts(false));
    let mut host = HostEnvironment::with_console(
        surfaces,
        &HostOptions::default().with_element_lookup(ElementLookup::renderer_canvas()),
        Box::new(MemoryConsole::new()),
    );
    assert!(run_script(&mut host, &script, &RunOptions::default()).success);
}

#[rstest]
#[case(r#"{"commands": [{"op": "stroke"}]}"#, "stroke() called without beginPath()")]
#[case(r#"{"commands": [{"op": "beginPath"}, {"op": "beginPath"}]}"#, "beginPath")]
#[case(r#"{"commands": [{"op": "setFillStyle", "style": "nocolor"}]}"#, "nocolor")]
#[case(r#"{"commands": [{"op": "setFont", "font": "Bravura"}]}"#, "Bravura")]
#[case(r#"{"commands": [{"op": "createElement", "tag": "div"}]}"#, "Cannot create element 'div'")]
#[case(r#"{"width": 0, "commands": []}"#, "Invalid dimensions")]
fn test_failures_are_uncaught_exceptions(#[case] script: &str, #[case] needle: &str) {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.png");
    let (mut host, console) = host(HarnessMode::PassThrough);
    let script = DrawScript::from_json(script).unwrap();
    let report = run_script(&mut host, &script, &RunOptions::default().with_output(&output));

    assert!(!report.success);
    let errors = console.messages(ConsoleLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Uncaught exception: "));
    assert!(errors[0].contains(needle), "{}", errors[0]);
    assert!(!output.exists());
}
