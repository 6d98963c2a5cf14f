//! Tolerant formatter for the `testCases` story field
//!
//! The generation service returns test cases in whatever shape the
//! language model produced: ready-made prose, a JSON array of case
//! objects, an object wrapping such an array, or an arbitrary object.
//! [`classify`] sorts the raw text into a [`TestCaseShape`] and
//! [`format_test_cases`] renders each shape. Formatting is pure and
//! total: any input that cannot be interpreted is returned verbatim.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Field-name variants for the case name, in fallback order
pub const NAME_KEYS: &[&str] = &["testCaseName", "test_case_name", "name", "title", "testName"];

/// Field-name variants for the case description
pub const DESCRIPTION_KEYS: &[&str] = &["description", "testDescription", "test_description"];

/// Field-name variants for the ordered steps
pub const STEPS_KEYS: &[&str] = &["steps", "testSteps", "test_steps"];

/// Field-name variants for the expected result
pub const EXPECTED_KEYS: &[&str] = &[
    "expectedResult",
    "expected_result",
    "expectedOutput",
    "expected_output",
    "expected",
];

/// Field-name variants for the input data
pub const INPUT_KEYS: &[&str] = &["inputData", "input_data", "input", "testData", "test_data"];

/// Field-name variants for the test type
pub const TYPE_KEYS: &[&str] = &["testType", "test_type", "type"];

/// Keys under which an object may wrap the actual case array
pub const WRAPPED_KEYS: &[&str] = &["testCases", "test_cases", "Test Cases", "tests"];

const INDENT: &str = "   ";

/// Classified shape of a raw `testCases` value
#[derive(Debug, Clone, PartialEq)]
pub enum TestCaseShape<'a> {
    /// Already human-readable text
    Prose(&'a str),
    /// JSON array of test cases
    Cases(Vec<Value>),
    /// JSON object wrapping an array of test cases
    Wrapped(Vec<Value>),
    /// Any other JSON object
    Object(Map<String, Value>),
    /// Bare JSON scalar (number, string literal, bool, null)
    Scalar(&'a str),
    /// Text that is neither prose nor valid JSON
    Unparseable(&'a str),
}

fn prose_lead_in() -> Option<&'static Regex> {
    static LEAD_IN: OnceLock<Option<Regex>> = OnceLock::new();
    LEAD_IN
        .get_or_init(|| {
            Regex::new(r"(?i)^(test\s*case|test\s*:|scenario\b|given\s|expected\s*:|\d+[.)]\s)").ok()
        })
        .as_ref()
}

fn looks_like_prose(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    if prose_lead_in().is_some_and(|re| re.is_match(trimmed)) {
        return true;
    }
    let structured = trimmed.starts_with('[') || trimmed.starts_with('{');
    raw.contains('\n') && !structured
}

fn take_wrapped(map: &mut Map<String, Value>) -> Option<Vec<Value>> {
    let key = WRAPPED_KEYS
        .iter()
        .find(|key| matches!(map.get(**key), Some(Value::Array(_))))?;
    match map.remove(*key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Sort raw test-case text into a [`TestCaseShape`]
///
/// # Examples
///
/// ```
/// use autoagile::formatter::{classify, TestCaseShape};
///
/// assert_eq!(classify("Test: ok"), TestCaseShape::Prose("Test: ok"));
/// assert!(matches!(classify(r#"[{"name":"a"}]"#), TestCaseShape::Cases(_)));
/// assert_eq!(classify("oops {"), TestCaseShape::Unparseable("oops {"));
/// ```
pub fn classify(raw: &str) -> TestCaseShape<'_> {
    if looks_like_prose(raw) {
        return TestCaseShape::Prose(raw);
    }

    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Array(items)) => TestCaseShape::Cases(items),
        Ok(Value::Object(mut map)) => match take_wrapped(&mut map) {
            Some(items) => TestCaseShape::Wrapped(items),
            None => TestCaseShape::Object(map),
        },
        Ok(_) => TestCaseShape::Scalar(raw),
        Err(_) => TestCaseShape::Unparseable(raw),
    }
}

/// Render raw test-case text for display
///
/// Never fails: prose, scalars, empty arrays and unparseable input come
/// back unchanged.
///
/// # Examples
///
/// ```
/// use autoagile::formatter::format_test_cases;
///
/// let out = format_test_cases(r#"[{"testCaseName":"Login","expectedResult":"200 OK"}]"#);
/// assert_eq!(out, "1. Login\n   Expected: \"200 OK\"");
/// ```
pub fn format_test_cases(raw: &str) -> String {
    match classify(raw) {
        TestCaseShape::Prose(text)
        | TestCaseShape::Scalar(text)
        | TestCaseShape::Unparseable(text) => text.to_string(),
        TestCaseShape::Cases(items) | TestCaseShape::Wrapped(items) => {
            if items.is_empty() {
                raw.to_string()
            } else {
                format_cases(&items)
            }
        }
        TestCaseShape::Object(map) => {
            serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| raw.to_string())
        }
    }
}

fn format_cases(items: &[Value]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format_case(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_case(number: usize, item: &Value) -> String {
    let case = match item {
        Value::Object(case) => case,
        other => return format!("{}. {}", number, plain_text(other)),
    };

    let name = first_present(case, NAME_KEYS)
        .map(plain_text)
        .unwrap_or_else(|| format!("Test Case {}", number));
    let mut lines = vec![format!("{}. {}", number, name)];

    if let Some(kind) = first_present(case, TYPE_KEYS) {
        lines.push(format!("{}Type: {}", INDENT, plain_text(kind)));
    }
    if let Some(description) = first_present(case, DESCRIPTION_KEYS) {
        lines.push(format!("{}Description: {}", INDENT, plain_text(description)));
    }
    if let Some(input) = first_present(case, INPUT_KEYS) {
        lines.push(format!("{}Input: {}", INDENT, json_text(input)));
    }
    if let Some(steps) = first_present(case, STEPS_KEYS) {
        match steps {
            Value::Array(steps) => {
                lines.push(format!("{}Steps:", INDENT));
                for (i, step) in steps.iter().enumerate() {
                    lines.push(format!("{0}{0}{1}. {2}", INDENT, i + 1, plain_text(step)));
                }
            }
            other => lines.push(format!("{}Steps: {}", INDENT, plain_text(other))),
        }
    }
    if let Some(expected) = first_present(case, EXPECTED_KEYS) {
        lines.push(format!("{}Expected: {}", INDENT, json_text(expected)));
    }

    lines.join("\n")
}

/// First non-null value among `keys`, checked left to right
fn first_present<'a>(case: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| case.get(*key).filter(|value| !value.is_null()))
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_text(value: &Value) -> String {
    value.to_string()
}
