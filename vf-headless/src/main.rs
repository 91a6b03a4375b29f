use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use vf_headless_canvas2d::{
    parse_color, parse_font, FontConfig, PixmapSurfaceFactory, ENGRAVING_FAMILIES,
};
use vf_headless_rs::{
    run_script_file, ElementLookup, HarnessMode, HostEnvironment, HostOptions, PathModeSetting,
    RunOptions, ScriptOverrides, TerminalConsole,
};

/// vf-headless: render music-engraving draw scripts to PNG without a browser
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output, including console.debug
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a draw script and write the canvas as PNG
    Render {
        /// Path to the input draw script (JSON)
        #[clap(short, long)]
        input: String,

        /// Path to the output PNG file
        #[clap(short, long)]
        output: Option<String>,

        /// Zoom factor, overriding the script
        #[clap(long)]
        zoom: Option<f64>,

        /// Background color, overriding the script
        #[clap(long)]
        background: Option<String>,

        /// Foreground color, overriding the script
        #[clap(long)]
        foreground: Option<String>,

        /// Paint every fill and stroke in the foreground color
        #[clap(long)]
        force_foreground: bool,

        /// Tolerate path calls outside beginPath()
        #[clap(long)]
        lenient: bool,

        /// Additional directory to load fonts from. May be repeated
        #[clap(long)]
        font_dir: Vec<String>,

        /// Do not load system fonts
        #[clap(long)]
        no_system_fonts: bool,

        /// Enable glyph hinting
        #[clap(long)]
        hinting: bool,

        /// Fail the run when any test records a failed assertion
        #[clap(long)]
        strict_asserts: bool,

        /// Make getElementById return a 500x400 canvas instead of failing
        #[clap(long)]
        element_canvas: bool,

        /// Directory for the images of tests that declare their own canvas
        #[clap(long)]
        image_dir: Option<String>,

        /// Music font name used in per-test image file names
        #[clap(long, default_value = "Bravura")]
        music_font: String,
    },

    /// Parse a CSS font shorthand and print the result
    ParseFont {
        /// Font shorthand, e.g. "bold 12pt Academico"
        text: String,
    },

    /// Parse a CSS color and print it as #rrggbbaa
    ParseColor {
        /// Color text, e.g. "rgba(10, 20, 30, 0.5)"
        text: String,
    },
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).as_ref())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            zoom,
            background,
            foreground,
            force_foreground,
            lenient,
            font_dir,
            no_system_fonts,
            hinting,
            strict_asserts,
            element_canvas,
            image_dir,
            music_font,
        } => {
            let mut font_config = FontConfig::default()
                .with_system_fonts(!no_system_fonts)
                .with_hinting(hinting);
            for dir in &font_dir {
                font_config = font_config.with_font_dir(expand_path(dir));
            }

            let host_options = HostOptions::default()
                .with_harness(if strict_asserts {
                    HarnessMode::Strict
                } else {
                    HarnessMode::PassThrough
                })
                .with_element_lookup(if element_canvas {
                    ElementLookup::renderer_canvas()
                } else {
                    ElementLookup::Unreachable
                })
                .with_debug(cli.verbose);

            let run_options = RunOptions {
                output: output.as_deref().map(expand_path),
                image_dir: image_dir.as_deref().map(expand_path),
                music_font,
                overrides: ScriptOverrides {
                    zoom,
                    background,
                    foreground,
                    force_foreground: force_foreground.then_some(true),
                    path_mode: lenient.then_some(PathModeSetting::Lenient),
                },
            };

            render(
                &expand_path(&input),
                &font_config,
                &host_options,
                &run_options,
                cli.verbose,
            )
        }
        Commands::ParseFont { text } => print_font(&text),
        Commands::ParseColor { text } => print_color(&text),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn render(
    input: &std::path::Path,
    font_config: &FontConfig,
    host_options: &HostOptions,
    run_options: &RunOptions,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let surfaces = PixmapSurfaceFactory::from_config(font_config);
    log::debug!("{} font faces loaded", surfaces.fonts().face_count());
    for family in surfaces.fonts().missing_families(ENGRAVING_FAMILIES) {
        log::warn!("Font family {family} is not installed; glyphs will fall back");
    }

    let console = TerminalConsole::new(std::io::stdout().is_terminal(), verbose);
    let mut host = HostEnvironment::with_console(surfaces, host_options, Box::new(console));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start the async runtime")?;
    let report = runtime.block_on(run_script_file(&mut host, input, run_options));

    if report.summary.total() > 0 {
        log::info!(
            "{} tests passed, {} failed",
            report.summary.passed,
            report.summary.failed
        );
    }
    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_font(text: &str) -> anyhow::Result<ExitCode> {
    let font = parse_font(text)?;
    println!("{font}");
    println!("family: {}", font.family.join(", "));
    println!("size: {}pt ({}px)", font.size, font.size_px());
    println!("bold: {}", font.bold);
    println!("italic: {}", font.italic);
    Ok(ExitCode::SUCCESS)
}

fn print_color(text: &str) -> anyhow::Result<ExitCode> {
    let color = parse_color(text)?;
    println!("{}", color.to_hex());
    Ok(ExitCode::SUCCESS)
}
