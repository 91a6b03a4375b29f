#![doc = include_str!("../README.md")]

pub mod clone;
pub mod console;
pub mod dom;
pub mod error;
pub mod factory;
pub mod harness;
pub mod host;
pub mod runner;
pub mod script;
pub mod window;

pub use clone::structured_clone;
pub use console::{ConsoleLevel, ConsoleLine, ConsoleSink, LogConsole, MemoryConsole, TerminalConsole};
pub use dom::{Document, Element, ElementLookup, SpanElement, SpanStyle, DEFAULT_SPAN_FONT};
pub use error::{HostError, HostResult};
pub use factory::{FactoryOptions, HeadlessFactory, PathModeSetting, TEST_CANVAS_SIZE};
pub use harness::{
    finish_test, run_test, Assert, PassThroughAssert, StrictAssert, TestOutcome, TestSummary,
};
pub use host::{HarnessMode, HostEnvironment, HostOptions};
pub use runner::{
    load_script, render_script, run_script, run_script_file, RunOptions, RunReport,
    ScriptOverrides,
};
pub use script::{
    image_file_name, AssertMethod, DrawCommand, DrawScript, ScriptExecutor, StateProperty,
    TestCanvas, DEFAULT_MUSIC_FONT,
};
pub use window::Window;
