//! Type inference for raw environment values.
//!
//! Every raw value is first reparsed as JSON, so `3000` becomes a number,
//! `true` a boolean and `{"a":1}` an object. Values that are not JSON stay
//! strings. The parsed value is then rendered either as a TypeScript
//! primitive type name or as a literal type:
//!
//! | Raw value | Type name | Literal |
//! |-----------|-----------|---------|
//! | `http://localhost` | `string` | `'http://localhost'` |
//! | `"quoted"` | `string` | `'quoted'` |
//! | `3000` | `number` | `3000` |
//! | `1e3`, `3000.0` | `number` | `1000`, `3000` |
//! | `1e400` | `number` | `Infinity` |
//! | `true` | `boolean` | `true` |
//! | `{"a":1}` | `object` | `{"a":1}` |
//! | `[1,2]` | `object` | `[1,2]` |
//! | `null` | `object` | `null` |
//!
//! Arrays and `null` report `object`, matching what `typeof` says at runtime.
//! Numbers print the way JavaScript prints them: integral values carry no
//! `.0`, `-0` is `0`, and very large or very small magnitudes use `e+`/`e-`
//! notation.

use std::fmt::Write as _;

use serde_json::{Number, Value};

use crate::error::ValueFallback;

/// A raw value after JSON reparsing.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvValue {
    /// Any value JSON can hold.
    Json(Value),

    /// A JSON number beyond the `f64` range, read by JavaScript as an infinity.
    Infinite {
        /// `-Infinity` rather than `Infinity`.
        negative: bool,
    },
}

impl From<Value> for EnvValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Parses `raw` as JSON, falling back to the raw string.
///
/// The fallback is returned alongside so the caller can report it. A bare
/// number too large for `f64` is not a fallback: it becomes
/// [`EnvValue::Infinite`].
pub fn parse_value(key: &str, raw: &str) -> (EnvValue, Option<ValueFallback>) {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => (EnvValue::Json(value), None),

        Err(source) => match overflowing_number(raw) {
            Some(negative) => (EnvValue::Infinite { negative }, None),

            None => (
                EnvValue::Json(Value::String(raw.to_string())),
                Some(ValueFallback {
                    key: key.to_string(),
                    value: raw.to_string(),
                    source,
                }),
            ),
        },
    }
}

/// Returns the runtime type name of a parsed value.
#[must_use]
pub const fn type_name(value: &EnvValue) -> &'static str {
    match value {
        EnvValue::Json(Value::String(_)) => "string",

        EnvValue::Json(Value::Number(_)) | EnvValue::Infinite { .. } => "number",

        EnvValue::Json(Value::Bool(_)) => "boolean",

        EnvValue::Json(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
    }
}

/// Renders a parsed value as a TypeScript literal type.
///
/// Strings are single-quoted; everything else is compact JSON with
/// JavaScript number formatting.
#[must_use]
pub fn literal(value: &EnvValue) -> String {
    match value {
        EnvValue::Json(Value::String(s)) => quote(s),

        EnvValue::Json(other) => {
            let mut out = String::new();
            write_compact(other, &mut out);
            out
        }

        EnvValue::Infinite { negative: true } => "-Infinity".to_string(),

        EnvValue::Infinite { negative: false } => "Infinity".to_string(),
    }
}

/// Returns the type representation for `value`.
///
/// `value_in_type` selects [`literal`] over [`type_name`].
#[must_use]
pub fn type_repr(value: &EnvValue, value_in_type: bool) -> String {
    if value_in_type {
        literal(value)
    } else {
        type_name(value).to_string()
    }
}

/// Formats a JSON number as JavaScript's `String(n)` would.
#[must_use]
pub fn number_text(number: &Number) -> String {
    if number.is_f64() {
        number.as_f64().map_or_else(|| number.to_string(), js_float)
    } else {
        number.to_string()
    }
}

fn js_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // Display is already the shortest round-trip text without a `.0`
        return f.to_string();
    }

    let text = format!("{f:e}");
    if text.contains("e-") {
        text
    } else {
        text.replacen('e', "e+", 1)
    }
}

fn write_compact(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => out.push_str(&number_text(n)),

        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(item, out);
            }
            out.push(']');
        }

        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}:", Value::from(key.as_str()));
                write_compact(item, out);
            }
            out.push('}');
        }

        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

/// Returns the sign of `raw` if it is JSON number syntax that overflows `f64`.
fn overflowing_number(raw: &str) -> Option<bool> {
    let text = raw.trim_matches([' ', '\t', '\n', '\r']);

    if !is_number_syntax(text) {
        return None;
    }

    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_infinite())
        .map(f64::is_sign_negative)
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_number_syntax(text: &str) -> bool {
    fn digits(s: &str) -> (&str, &str) {
        s.split_at(s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()))
    }

    let (int, rest) = digits(text.strip_prefix('-').unwrap_or(text));
    if int.is_empty() || (int.len() > 1 && int.starts_with('0')) {
        return false;
    }

    let rest = match rest.strip_prefix('.') {
        Some(fraction) => match digits(fraction) {
            ("", _) => return false,
            (_, rest) => rest,
        },
        None => rest,
    };

    match rest.strip_prefix(['e', 'E']) {
        Some(exp) => {
            let (exp_digits, tail) = digits(exp.strip_prefix(['+', '-']).unwrap_or(exp));
            !exp_digits.is_empty() && tail.is_empty()
        }
        None => rest.is_empty(),
    }
}

/// Single-quotes a string, escaping what would break the literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');

    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }

    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(raw: &str, value_in_type: bool) -> String {
        type_repr(&parse_value("KEY", raw).0, value_in_type)
    }

    #[test]
    fn test_number() {
        assert_eq!(repr("3000", false), "number");
        assert_eq!(repr("3000", true), "3000");
        assert_eq!(repr("-1.5", true), "-1.5");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(repr("true", false), "boolean");
        assert_eq!(repr("false", true), "false");
    }

    #[test]
    fn test_object_and_array() {
        assert_eq!(repr(r#"{"a":1}"#, false), "object");
        assert_eq!(repr(r#"{"a":1}"#, true), r#"{"a":1}"#);
        assert_eq!(repr(r#"{"debug": true, "port": 3000}"#, true), r#"{"debug":true,"port":3000}"#);
        assert_eq!(repr("[1, 2]", false), "object");
        assert_eq!(repr("[1, 2]", true), "[1,2]");
        assert_eq!(repr("null", false), "object");
    }

    #[test]
    fn test_plain_string_falls_back() {
        let (value, fallback) = parse_value("VITE_API_URL", "http://localhost:3000");
        assert_eq!(value, EnvValue::Json(Value::String("http://localhost:3000".to_string())));

        let fallback = fallback.expect("URL is not JSON");
        assert_eq!(fallback.key, "VITE_API_URL");
        assert_eq!(fallback.value, "http://localhost:3000");

        assert_eq!(type_repr(&value, false), "string");
        assert_eq!(type_repr(&value, true), "'http://localhost:3000'");
    }

    #[test]
    fn test_json_string_is_unquoted_once() {
        let (value, fallback) = parse_value("KEY", r#""hello""#);
        assert!(fallback.is_none());
        assert_eq!(type_repr(&value, true), "'hello'");
    }

    #[test]
    fn test_invalid_json_is_string() {
        assert_eq!(repr("{invalid json", false), "string");
        assert_eq!(repr("", false), "string");
    }

    #[test]
    fn test_literal_escapes_quotes() {
        let value = EnvValue::from(Value::String(r"it's a \ path".to_string()));
        assert_eq!(literal(&value), r"'it\'s a \\ path'");

        let value = EnvValue::from(Value::String("line\nbreak".to_string()));
        assert_eq!(literal(&value), r"'line\nbreak'");
    }

    #[test]
    fn test_numbers_print_like_javascript() {
        assert_eq!(repr("1e3", true), "1000");
        assert_eq!(repr("3000.0", true), "3000");
        assert_eq!(repr("-0", true), "0");
        assert_eq!(repr("-0.0", true), "0");
        assert_eq!(repr("0.1", true), "0.1");
        assert_eq!(repr("2.5e-3", true), "0.0025");
        assert_eq!(repr("1e21", true), "1e+21");
        assert_eq!(repr("1.5e-7", true), "1.5e-7");
        assert_eq!(repr("18446744073709551615", true), "18446744073709551615");
        assert_eq!(repr(r#"{"timeout":1e3,"ratio":[0.5,2.0]}"#, true), r#"{"timeout":1000,"ratio":[0.5,2]}"#);
    }

    #[test]
    fn test_overflowing_number_is_infinite() {
        let (value, fallback) = parse_value("KEY", "1e400");
        assert!(fallback.is_none());
        assert_eq!(value, EnvValue::Infinite { negative: false });
        assert_eq!(type_repr(&value, false), "number");
        assert_eq!(type_repr(&value, true), "Infinity");

        assert_eq!(repr("-1e400", true), "-Infinity");
        assert_eq!(repr(" 1E+999\n", false), "number");
    }

    #[test]
    fn test_non_json_infinity_spellings_stay_strings() {
        for raw in ["inf", "Infinity", "+1e400", "01e400", "1.e400", "1e400x"] {
            let (value, fallback) = parse_value("KEY", raw);
            assert!(fallback.is_some(), "{raw}");
            assert_eq!(type_name(&value), "string", "{raw}");
        }
    }

    #[test]
    fn test_nested_strings_keep_json_escapes() {
        assert_eq!(repr(r#"{"msg":"a\"b"}"#, true), r#"{"msg":"a\"b"}"#);
    }
}
