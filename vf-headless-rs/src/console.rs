//! Console sinks handed to the rendering side in place of the browser `console`.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

const YELLOW: &str = "\x1b[33m";
const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[39m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    #[default]
    Log,
    Warn,
    Error,
    Debug,
}

/// Where `console.log`/`warn`/`error`/`debug` end up.
pub trait ConsoleSink {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);

    /// Report a passing test. Terminal sinks color the verdict.
    fn test_passed(&self, label: &str) {
        self.log(&format!("{label} ... ok"));
    }

    fn test_failed(&self, label: &str) {
        self.error(&format!("{label} ... FAILED"));
    }

    fn write(&self, level: ConsoleLevel, message: &str) {
        match level {
            ConsoleLevel::Log => self.log(message),
            ConsoleLevel::Warn => self.warn(message),
            ConsoleLevel::Error => self.error(message),
            ConsoleLevel::Debug => self.debug(message),
        }
    }
}

/// Forwards console output to the `log` facade under the `host` target.
#[derive(Debug, Clone, Default)]
pub struct LogConsole {
    debug: bool,
}

impl LogConsole {
    /// `debug` enables `console.debug`; otherwise those messages are dropped.
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl ConsoleSink for LogConsole {
    fn log(&self, message: &str) {
        log::info!(target: "host", "{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!(target: "host", "{message}");
    }

    fn error(&self, message: &str) {
        log::error!(target: "host", "{message}");
    }

    fn debug(&self, message: &str) {
        if self.debug {
            log::debug!(target: "host", "{message}");
        }
    }
}

/// Writes to stdout (log, debug) and stderr (warn, error), optionally with ANSI colors.
#[derive(Debug, Clone, Default)]
pub struct TerminalConsole {
    color: bool,
    debug: bool,
}

impl TerminalConsole {
    pub fn new(color: bool, debug: bool) -> Self {
        Self { color, debug }
    }

    fn paint(&self, code: &str, message: &str) -> String {
        if self.color {
            format!("{code}{message}{RESET}")
        } else {
            message.to_string()
        }
    }
}

impl ConsoleSink for TerminalConsole {
    fn log(&self, message: &str) {
        let _ = writeln!(std::io::stdout(), "{message}");
    }

    fn warn(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "{}", self.paint(YELLOW, message));
    }

    fn error(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "{}", self.paint(BRIGHT_RED, message));
    }

    fn debug(&self, message: &str) {
        if self.debug {
            let _ = writeln!(std::io::stdout(), "{message}");
        }
    }

    fn test_passed(&self, label: &str) {
        self.log(&format!("{label} ... {}", self.paint(BRIGHT_GREEN, "ok")));
    }

    fn test_failed(&self, label: &str) {
        let _ = writeln!(
            std::io::stdout(),
            "{label} ... {}",
            self.paint(BRIGHT_RED, "FAILED")
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: ConsoleLevel,
    pub message: String,
}

/// Captures console output in memory. Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    lines: Rc<RefCell<Vec<ConsoleLine>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lines.borrow().clone()
    }

    /// Messages at `level`, in order.
    pub fn messages(&self, level: ConsoleLevel) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|line| line.level == level)
            .map(|line| line.message.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|line| line.message.contains(needle))
    }

    fn push(&self, level: ConsoleLevel, message: &str) {
        self.lines.borrow_mut().push(ConsoleLine {
            level,
            message: message.to_string(),
        });
    }
}

impl ConsoleSink for MemoryConsole {
    fn log(&self, message: &str) {
        self.push(ConsoleLevel::Log, message);
    }

    fn warn(&self, message: &str) {
        self.push(ConsoleLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(ConsoleLevel::Error, message);
    }

    fn debug(&self, message: &str) {
        self.push(ConsoleLevel::Debug, message);
    }
}
