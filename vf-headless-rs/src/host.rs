//! The host environment handed to a rendering run.

use crate::console::{ConsoleSink, LogConsole};
use crate::dom::{Document, ElementLookup};
use crate::harness::{Assert, PassThroughAssert, StrictAssert};
use crate::window::Window;
use std::rc::Rc;
use vf_headless_canvas2d::SurfaceFactory;

/// Which assertion harness a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarnessMode {
    /// Accept every assertion. Used when generating reference images.
    #[default]
    PassThrough,
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub element_lookup: ElementLookup,
    pub harness: HarnessMode,
    /// Forward `console.debug`.
    pub debug: bool,
}

impl HostOptions {
    pub fn with_element_lookup(mut self, lookup: ElementLookup) -> Self {
        self.element_lookup = lookup;
        self
    }

    pub fn with_harness(mut self, mode: HarnessMode) -> Self {
        self.harness = mode;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Everything the rendering side can reach: console, document, window and the
/// assertion harness.
pub struct HostEnvironment<F: SurfaceFactory> {
    pub console: Box<dyn ConsoleSink>,
    pub document: Document<F>,
    pub window: Window,
    pub harness: Box<dyn Assert>,
}

impl<F: SurfaceFactory> HostEnvironment<F> {
    /// A host that logs through the `log` facade.
    pub fn new(surfaces: F, options: &HostOptions) -> Self {
        Self::with_console(surfaces, options, Box::new(LogConsole::new(options.debug)))
    }

    pub fn with_console(surfaces: F, options: &HostOptions, console: Box<dyn ConsoleSink>) -> Self {
        let harness: Box<dyn Assert> = match options.harness {
            HarnessMode::PassThrough => Box::new(PassThroughAssert::new()),
            HarnessMode::Strict => Box::new(StrictAssert::new()),
        };
        log::debug!(
            target: "host",
            "host environment: harness {:?}, element lookup {:?}",
            options.harness,
            options.element_lookup
        );
        Self {
            console,
            document: Document::new(Rc::new(surfaces), options.element_lookup.clone()),
            window: Window::new(),
            harness,
        }
    }

    pub fn surfaces(&self) -> &F {
        self.document.surfaces().as_ref()
    }
}
