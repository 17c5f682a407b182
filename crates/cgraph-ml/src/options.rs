//! Command options
//!
//! [`CommandOptions`] is an ordered map from option name to [`OptionValue`].
//! Keyword lists in the older case-inferred form go through
//! [`CommandOptions::from_keywords`]:
//!
//! - all-uppercase name, value other than `-1`: `-NAME value`
//! - all-uppercase name with `-1`: omitted
//! - all-lowercase name: `-name` when the value is truthy
//! - anything else: handled by [`OptionPolicy`]

use crate::error::{AdapterError, AdapterResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Rendering category of one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    /// Presence-only flag, rendered as `-name` when set
    Flag(bool),
    /// Rendered as `-name value`
    Valued(String),
    /// Not rendered
    Absent,
}

impl OptionValue {
    /// Command fragment for this option, empty when nothing is rendered
    pub fn fragment(&self, name: &str) -> String {
        match self {
            OptionValue::Flag(true) => format!(" -{name}"),
            OptionValue::Valued(value) => format!(" -{name} {value}"),
            OptionValue::Flag(false) | OptionValue::Absent => String::new(),
        }
    }
}

/// What to do with a keyword that is neither all-uppercase nor all-lowercase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionPolicy {
    /// Drop the keyword with a warning
    #[default]
    Skip,
    /// Fail with [`AdapterError::UnrecognizedOption`]
    Reject,
}

/// Dynamically typed keyword value
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl KeywordValue {
    /// The `-1` absent marker, matched numerically
    pub fn is_sentinel(&self) -> bool {
        match self {
            KeywordValue::Int(v) => *v == -1,
            KeywordValue::Float(v) => *v == -1.0,
            KeywordValue::Bool(_) | KeywordValue::Str(_) => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            KeywordValue::Bool(b) => *b,
            KeywordValue::Int(v) => *v != 0,
            KeywordValue::Float(v) => *v != 0.0,
            KeywordValue::Str(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for KeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordValue::Bool(true) => write!(f, "True"),
            KeywordValue::Bool(false) => write!(f, "False"),
            KeywordValue::Int(v) => write!(f, "{v}"),
            KeywordValue::Float(v) => f.write_str(&python_float(*v)),
            KeywordValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Float text as Python's `str(float)` writes it: shortest round-trip digits,
/// `nan`, and a signed exponent of at least two digits (`1e+16`, `1e-05`)
fn python_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    // Debug already switches to exponent form at the same magnitudes as Python
    let text = format!("{v:?}");
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

impl From<bool> for KeywordValue {
    fn from(v: bool) -> Self {
        KeywordValue::Bool(v)
    }
}

impl From<i64> for KeywordValue {
    fn from(v: i64) -> Self {
        KeywordValue::Int(v)
    }
}

impl From<i32> for KeywordValue {
    fn from(v: i32) -> Self {
        KeywordValue::Int(i64::from(v))
    }
}

impl From<f64> for KeywordValue {
    fn from(v: f64) -> Self {
        KeywordValue::Float(v)
    }
}

impl From<&str> for KeywordValue {
    fn from(v: &str) -> Self {
        KeywordValue::Str(v.to_string())
    }
}

impl From<String> for KeywordValue {
    fn from(v: String) -> Self {
        KeywordValue::Str(v)
    }
}

/// Has at least one cased character and no lowercase ones
fn is_upper(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Has at least one cased character and no uppercase ones
fn is_lower(name: &str) -> bool {
    name.chars().any(char::is_lowercase) && !name.chars().any(char::is_uppercase)
}

/// Ordered option map, rendered in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandOptions {
    entries: IndexMap<String, OptionValue>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a presence-only flag
    pub fn flag(mut self, name: impl Into<String>, set: bool) -> Self {
        self.entries.insert(name.into(), OptionValue::Flag(set));
        self
    }

    /// Add a valued option
    pub fn value(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.entries
            .insert(name.into(), OptionValue::Valued(value.to_string()));
        self
    }

    /// Declare an option that is not rendered
    pub fn absent(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), OptionValue::Absent);
        self
    }

    /// Insert or replace an option, keeping its existing position
    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Classify keywords by letter case
    pub fn from_keywords<K: AsRef<str>>(
        keywords: &[(K, KeywordValue)],
        policy: OptionPolicy,
    ) -> AdapterResult<Self> {
        let mut options = Self::new();
        for (name, value) in keywords {
            let name = name.as_ref();
            let classified = if is_upper(name) {
                if value.is_sentinel() {
                    OptionValue::Absent
                } else {
                    OptionValue::Valued(value.to_string())
                }
            } else if is_lower(name) {
                OptionValue::Flag(value.is_truthy())
            } else {
                match policy {
                    OptionPolicy::Skip => {
                        warn!("Skipping option '{}': name is neither upper- nor lowercase", name);
                        continue;
                    }
                    OptionPolicy::Reject => {
                        return Err(AdapterError::UnrecognizedOption(name.to_string()));
                    }
                }
            };
            options.insert(name, classified);
        }
        Ok(options)
    }
}
