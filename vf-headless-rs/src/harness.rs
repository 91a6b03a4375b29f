//! The QUnit-shaped assertion harness the rendering library's tests call into.
//!
//! Two implementations are provided. [`StrictAssert`] records every failed assertion
//! and makes the run fail; [`PassThroughAssert`] accepts everything, which is what an
//! image-generation run wants. Both report each test on the console as
//! `test <module>::<name> ... ok`.

use crate::console::ConsoleSink;
use crate::error::HostResult;
use serde::Serialize;
use serde_json::Value;

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    /// `module::test: message` for every failed assertion.
    pub failures: Vec<String>,
}

impl TestSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(Vec<String>),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

pub trait Assert {
    /// Start a named group. Later tests are reported as `<module>::<test>`.
    fn module(&mut self, name: &str);

    fn current_module(&self) -> &str;

    fn begin_test(&mut self, name: &str);

    /// Close the current test and fold it into the summary.
    fn end_test(&mut self) -> TestOutcome;

    /// Record the result of one assertion.
    fn record(&mut self, passed: bool, message: String);

    /// Declare how many assertions the current test must run.
    fn expect(&mut self, count: usize);

    fn summary(&self) -> TestSummary;

    fn ok(&mut self, value: &Value, message: Option<&str>) {
        let passed = truthy(value);
        self.record(passed, describe(message, || format!("ok: {value} is not truthy")));
    }

    fn not_ok(&mut self, value: &Value, message: Option<&str>) {
        let passed = !truthy(value);
        self.record(passed, describe(message, || format!("notOk: {value} is truthy")));
    }

    fn equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = loose_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("equal: expected {expected}, got {actual}")),
        );
    }

    fn not_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = !loose_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("notEqual: {actual} == {expected}")),
        );
    }

    fn strict_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = strict_equal(actual, expected);
        self.record(
            passed,
            describe(message, || {
                format!("strictEqual: expected {expected}, got {actual}")
            }),
        );
    }

    fn not_strict_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = !strict_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("notStrictEqual: {actual} === {expected}")),
        );
    }

    fn deep_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = deep_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("deepEqual: expected {expected}, got {actual}")),
        );
    }

    fn not_deep_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = !deep_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("notDeepEqual: {actual} equals {expected}")),
        );
    }

    fn prop_equal(&mut self, actual: &Value, expected: &Value, message: Option<&str>) {
        let passed = deep_equal(actual, expected);
        self.record(
            passed,
            describe(message, || format!("propEqual: expected {expected}, got {actual}")),
        );
    }

    /// `raised` tells whether the guarded block failed.
    fn throws(&mut self, raised: bool, message: Option<&str>) {
        self.record(
            raised,
            describe(message, || "throws: block did not raise".to_string()),
        );
    }
}

fn describe(message: Option<&str>, default: impl FnOnce() -> String) -> String {
    message.map(str::to_string).unwrap_or_else(default)
}

#[derive(Debug, Default)]
struct RunningTest {
    name: String,
    assertions: usize,
    expected: Option<usize>,
    failures: Vec<String>,
}

/// Records failures and `expect` mismatches.
#[derive(Debug, Default)]
pub struct StrictAssert {
    module: String,
    current: Option<RunningTest>,
    summary: TestSummary,
}

impl StrictAssert {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(&self, test: &str) -> String {
        format!("{}::{}", self.module, test)
    }
}

impl Assert for StrictAssert {
    fn module(&mut self, name: &str) {
        self.module = name.to_string();
    }

    fn current_module(&self) -> &str {
        &self.module
    }

    fn begin_test(&mut self, name: &str) {
        self.current = Some(RunningTest {
            name: name.to_string(),
            ..RunningTest::default()
        });
    }

    fn end_test(&mut self) -> TestOutcome {
        let Some(mut test) = self.current.take() else {
            return TestOutcome::Passed;
        };
        if let Some(expected) = test.expected {
            if expected != test.assertions {
                test.failures.push(format!(
                    "expected {expected} assertions, but {} were run",
                    test.assertions
                ));
            }
        }
        if test.failures.is_empty() {
            self.summary.passed += 1;
            return TestOutcome::Passed;
        }
        self.summary.failed += 1;
        let label = self.label(&test.name);
        self.summary
            .failures
            .extend(test.failures.iter().map(|msg| format!("{label}: {msg}")));
        TestOutcome::Failed(test.failures)
    }

    fn record(&mut self, passed: bool, message: String) {
        match self.current.as_mut() {
            Some(test) => {
                test.assertions += 1;
                if !passed {
                    test.failures.push(message);
                }
            }
            None if !passed => {
                let label = self.label("<toplevel>");
                self.summary.failures.push(format!("{label}: {message}"));
            }
            None => {}
        }
    }

    fn expect(&mut self, count: usize) {
        if let Some(test) = self.current.as_mut() {
            test.expected = Some(count);
        }
    }

    fn summary(&self) -> TestSummary {
        self.summary.clone()
    }
}

/// Accepts every assertion. Tests only fail by raising.
#[derive(Debug, Default)]
pub struct PassThroughAssert {
    module: String,
    in_test: bool,
    summary: TestSummary,
}

impl PassThroughAssert {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Assert for PassThroughAssert {
    fn module(&mut self, name: &str) {
        self.module = name.to_string();
    }

    fn current_module(&self) -> &str {
        &self.module
    }

    fn begin_test(&mut self, _name: &str) {
        self.in_test = true;
    }

    fn end_test(&mut self) -> TestOutcome {
        if std::mem::take(&mut self.in_test) {
            self.summary.passed += 1;
        }
        TestOutcome::Passed
    }

    fn record(&mut self, _passed: bool, _message: String) {}

    fn expect(&mut self, _count: usize) {}

    fn summary(&self) -> TestSummary {
        self.summary.clone()
    }
}

/// Close a test whose body produced `body`, and report it on `console`.
///
/// A body error counts as a failed test and is returned to the caller.
pub fn finish_test<A: Assert + ?Sized>(
    assert: &mut A,
    console: &dyn ConsoleSink,
    name: &str,
    body: HostResult<()>,
) -> HostResult<TestOutcome> {
    let label = format!("test {}::{}", assert.current_module(), name);
    match body {
        Ok(()) => {
            let outcome = assert.end_test();
            match &outcome {
                TestOutcome::Passed => console.test_passed(&label),
                TestOutcome::Failed(failures) => {
                    console.test_failed(&label);
                    for failure in failures {
                        console.error(&format!("    {failure}"));
                    }
                }
            }
            Ok(outcome)
        }
        Err(err) => {
            assert.record(false, err.to_string());
            assert.end_test();
            console.test_failed(&label);
            Err(err)
        }
    }
}

/// `QUnit.test(name, body)`.
pub fn run_test<A, B>(
    assert: &mut A,
    console: &dyn ConsoleSink,
    name: &str,
    body: B,
) -> HostResult<TestOutcome>
where
    A: Assert + ?Sized,
    B: FnOnce(&mut A) -> HostResult<()>,
{
    assert.begin_test(name);
    let result = body(assert);
    finish_test(assert, console, name, result)
}

/// JavaScript truthiness of a JSON value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `==`, with arrays and objects converted to their string form against primitives.
pub fn loose_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(_), _) => loose_equal(&to_number(a), b),
        (_, Value::Bool(_)) => loose_equal(a, &to_number(b)),
        (Value::Number(_), Value::String(_)) => loose_equal(a, &to_number(b)),
        (Value::String(_), Value::Number(_)) => loose_equal(&to_number(a), b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
        (Value::Array(_) | Value::Object(_), _) => {
            loose_equal(&Value::String(to_js_string(a)), b)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_equal(a, &Value::String(to_js_string(b)))
        }
        _ => strict_equal(a, b),
    }
}

/// `===`: arrays and objects are never identical to another value.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            false
        }
        _ => a == b,
    }
}

/// Structural equality with numbers compared by value (`1` equals `1.0`).
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}

fn to_number(value: &Value) -> Value {
    let number = match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                match trimmed.parse::<f64>() {
                    Ok(n) => n,
                    Err(_) => return Value::Null,
                }
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => return Value::Null,
    };
    serde_json::Number::from_f64(number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}
