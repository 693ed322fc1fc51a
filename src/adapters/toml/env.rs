//! Environment placeholders in configuration values
//!
//! A string that consists only of `%env(NAME)%` or `%env(TYPE:NAME)%` is
//! replaced by the variable's value converted to `TYPE` (`bool`, `int`,
//! `float` or `string`). Placeholders inside a longer string are interpolated
//! as text.

use regex::{Captures, Regex};
use serde_json::{Number, Value};

use super::ConfigError;

const PLACEHOLDER: &str = r"%env\((?:(bool|int|float|string):)?([A-Za-z_][A-Za-z0-9_]*)\)%";

/// Replace every placeholder in `value`, looking variables up with `lookup`
pub fn substitute_with<F>(value: &mut Value, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let placeholder = Regex::new(PLACEHOLDER).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    substitute(value, &placeholder, lookup)
}

fn substitute<F>(value: &mut Value, placeholder: &Regex, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(text) => {
            if let Some(replacement) = replace(text, placeholder, lookup)? {
                *value = replacement;
            }
        },
        Value::Array(items) => {
            for item in items {
                substitute(item, placeholder, lookup)?;
            }
        },
        Value::Object(table) => {
            for item in table.values_mut() {
                substitute(item, placeholder, lookup)?;
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) => {},
    }
    Ok(())
}

fn replace<F>(text: &str, placeholder: &Regex, lookup: &F) -> Result<Option<Value>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(first) = placeholder.captures(text) else {
        return Ok(None);
    };

    if first.get(0).is_some_and(|m| m.range() == (0..text.len())) {
        let (kind, raw) = resolve(&first, lookup)?;
        return convert(kind, &first[2], raw).map(Some);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for captures in placeholder.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&resolve(&captures, lookup)?.1);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(Some(Value::String(out)))
}

fn resolve<'t, F>(captures: &Captures<'t>, lookup: &F) -> Result<(Option<&'t str>, String), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let name = &captures[2];
    let raw = lookup(name).ok_or_else(|| ConfigError::MissingVariable(name.to_string()))?;
    Ok((captures.get(1).as_ref().map(regex::Match::as_str), raw))
}

fn convert(kind: Option<&str>, name: &str, raw: String) -> Result<Value, ConfigError> {
    let invalid = |kind: &str, raw: &str| ConfigError::InvalidVariable {
        name: name.to_string(),
        kind: kind.to_string(),
        value: raw.to_string(),
    };

    match kind {
        Some("bool") => parse_bool(&raw).map(Value::Bool).ok_or_else(|| invalid("bool", &raw)),
        Some("int") => raw.trim().parse::<i64>().map(Value::from).map_err(|_| invalid("int", &raw)),
        Some("float") => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("float", &raw)),
        _ => Ok(Value::String(raw)),
    }
}

/// Interpret common spellings of booleans
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "" | "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
