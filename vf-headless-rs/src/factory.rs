//! `HeadlessFactory`: a canvas plus its context, sized and colored for one rendering.

use crate::error::HostResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vf_headless_canvas2d::{
    Canvas, CanvasContext, CanvasOptions, NativeSurface, PathMode, SurfaceFactory,
};

/// Width and height the test helpers use for a per-test canvas.
pub const TEST_CANVAS_SIZE: (u32, u32) = (450, 140);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathModeSetting {
    #[default]
    Strict,
    Lenient,
}

impl From<PathModeSetting> for PathMode {
    fn from(value: PathModeSetting) -> Self {
        match value {
            PathModeSetting::Strict => PathMode::Strict,
            PathModeSetting::Lenient => PathMode::Lenient,
        }
    }
}

/// Canvas options as they appear in a draw script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactoryOptions {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub background: String,
    pub foreground: String,
    pub force_foreground: bool,
    pub path_mode: PathModeSetting,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 200,
            zoom: 1.0,
            background: "#00000000".to_string(),
            foreground: "#111".to_string(),
            force_foreground: false,
            path_mode: PathModeSetting::Strict,
        }
    }
}

impl FactoryOptions {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = color.into();
        self
    }

    pub fn with_force_foreground(mut self, force: bool) -> Self {
        self.force_foreground = force;
        self
    }

    pub fn with_path_mode(mut self, mode: PathModeSetting) -> Self {
        self.path_mode = mode;
        self
    }

    pub fn canvas_options(&self) -> CanvasOptions {
        CanvasOptions::new(self.width, self.height)
            .with_zoom(self.zoom)
            .with_background(self.background.clone())
            .with_foreground(self.foreground.clone())
            .with_force_foreground(self.force_foreground)
            .with_path_mode(self.path_mode.into())
    }
}

pub struct HeadlessFactory<S: NativeSurface> {
    options: FactoryOptions,
    canvas: Canvas<S>,
}

impl<S: NativeSurface> HeadlessFactory<S> {
    pub fn new<F>(surfaces: &F, options: FactoryOptions) -> HostResult<Self>
    where
        F: SurfaceFactory<Surface = S> + ?Sized,
    {
        let canvas = Canvas::new(surfaces, &options.canvas_options())?;
        Ok(Self { options, canvas })
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    /// The 2D context the renderer draws into.
    pub fn context(&mut self) -> &mut CanvasContext<S> {
        self.canvas.context_mut()
    }

    pub fn to_png(&self) -> HostResult<Vec<u8>> {
        Ok(self.canvas.to_png()?)
    }

    pub fn save_file(&self, path: &Path) -> HostResult<()> {
        self.canvas.save_png(path)?;
        Ok(())
    }

    pub fn into_canvas(self) -> Canvas<S> {
        self.canvas
    }
}
