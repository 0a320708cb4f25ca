//! Typed flag declarations.
//!
//! A flag is declared once on a [`Command`](crate::Command) with a name, a
//! typed default and a usage string. During dispatch each declaration
//! registers itself into a fresh [`FlagSet`] and, once the tokens have been
//! consumed, reports its resolved [`FlagValue`].
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Flag, FlagSet, FlagValue, StringFlag};
//!
//! let flag = StringFlag::new("m").with_default("moe").with_usage("message");
//! let mut set = FlagSet::new();
//! flag.register_into(&mut set);
//! assert_eq!(flag.resolved_value(&set), FlagValue::String("moe".into()));
//!
//! set.set("m", "32").unwrap();
//! assert_eq!(flag.resolved_value(&set), FlagValue::String("32".into()));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flagset::FlagSet;

/// The kind of value a flag holds. Fixed at declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    String,
    Bool,
    Int,
    Uint,
}

impl FlagKind {
    /// Lowercase name of the kind, as used in manifests and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::String => "string",
            FlagKind::Bool => "bool",
            FlagKind::Int => "int",
            FlagKind::Uint => "uint",
        }
    }

    /// The zero value of this kind.
    pub fn zero(self) -> FlagValue {
        match self {
            FlagKind::String => FlagValue::String(String::new()),
            FlagKind::Bool => FlagValue::Bool(false),
            FlagKind::Int => FlagValue::Int(0),
            FlagKind::Uint => FlagValue::Uint(0),
        }
    }

    /// Parses raw text as a value of this kind.
    ///
    /// Returns `None` when the text does not fit the kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{FlagKind, FlagValue};
    ///
    /// assert_eq!(FlagKind::Int.parse("-0x10"), Some(FlagValue::Int(-16)));
    /// assert_eq!(FlagKind::Bool.parse("T"), Some(FlagValue::Bool(true)));
    /// assert_eq!(FlagKind::Uint.parse("-1"), None);
    /// ```
    pub fn parse(self, raw: &str) -> Option<FlagValue> {
        match self {
            FlagKind::String => Some(FlagValue::String(raw.to_string())),
            FlagKind::Bool => parse_bool(raw).map(FlagValue::Bool),
            FlagKind::Int => parse_int(raw).map(FlagValue::Int),
            FlagKind::Uint => parse_uint(raw).map(FlagValue::Uint),
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, typed flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
}

impl FlagValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::String(_) => FlagKind::String,
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::Uint(_) => FlagKind::Uint,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::String(s) => f.write_str(s),
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::Uint(u) => write!(f, "{u}"),
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::String(value)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<u64> for FlagValue {
    fn from(value: u64) -> Self {
        FlagValue::Uint(value)
    }
}

/// A flag declaration.
///
/// Implementors only describe themselves; registration and resolution are
/// provided in terms of [`FlagSet`], so new kinds do not touch the resolver or
/// the dispatcher.
pub trait Flag: fmt::Debug + Send + Sync {
    /// Name of the flag, without leading dashes.
    fn name(&self) -> &str;

    /// Usage text shown in help output.
    fn usage(&self) -> &str;

    /// Value used when the flag is absent from the input.
    fn default_value(&self) -> FlagValue;

    /// Kind of the flag, derived from its default.
    fn kind(&self) -> FlagKind {
        self.default_value().kind()
    }

    /// Registers this declaration into a parse target, binding its default.
    fn register_into(&self, set: &mut FlagSet) {
        set.define(self.name(), self.default_value(), self.usage());
    }

    /// Reports the value this flag resolved to in `set`.
    fn resolved_value(&self, set: &FlagSet) -> FlagValue {
        set.value(self.name())
            .cloned()
            .unwrap_or_else(|| self.default_value())
    }
}

/// A flag holding free-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFlag {
    pub name: String,
    pub value: String,
    pub usage: String,
}

impl StringFlag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }
}

impl Flag for StringFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn default_value(&self) -> FlagValue {
        FlagValue::String(self.value.clone())
    }
}

/// A presence flag: `-v` alone means `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolFlag {
    pub name: String,
    pub value: bool,
    pub usage: String,
}

impl BoolFlag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }
}

impl Flag for BoolFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn default_value(&self) -> FlagValue {
        FlagValue::Bool(self.value)
    }
}

/// A signed integer flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntFlag {
    pub name: String,
    pub value: i64,
    pub usage: String,
}

impl IntFlag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }
}

impl Flag for IntFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn default_value(&self) -> FlagValue {
        FlagValue::Int(self.value)
    }
}

/// An unsigned integer flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UintFlag {
    pub name: String,
    pub value: u64,
    pub usage: String,
}

impl UintFlag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: u64) -> Self {
        self.value = value;
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }
}

impl Flag for UintFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn default_value(&self) -> FlagValue {
        FlagValue::Uint(self.value)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Splits an optional base prefix off an unsigned literal.
fn radix_of(digits: &str) -> (u32, &str) {
    let lower = digits.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    }
}

fn parse_uint(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let (radix, digits) = radix_of(digits);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

fn parse_int(raw: &str) -> Option<i64> {
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (radix, digits) = radix_of(rest);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        if magnitude == i64::MIN.unsigned_abs() {
            Some(i64::MIN)
        } else {
            i64::try_from(magnitude).ok().map(|m| -m)
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_zero_values() {
        assert_eq!(StringFlag::new("s").default_value(), FlagValue::String(String::new()));
        assert_eq!(BoolFlag::new("b").default_value(), FlagValue::Bool(false));
        assert_eq!(IntFlag::new("i").default_value(), FlagValue::Int(0));
        assert_eq!(UintFlag::new("u").default_value(), FlagValue::Uint(0));
    }

    #[test]
    fn test_kind_follows_declaration() {
        assert_eq!(StringFlag::new("m").kind(), FlagKind::String);
        assert_eq!(BoolFlag::new("dl").kind(), FlagKind::Bool);
        assert_eq!(IntFlag::new("n").with_default(-3).kind(), FlagKind::Int);
        assert_eq!(UintFlag::new("c").with_default(7).kind(), FlagKind::Uint);
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0x1f"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int("9223372036854775808"), None);
        assert_eq!(parse_int("--1"), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_parse_uint_rejects_sign() {
        assert_eq!(parse_uint("10"), Some(10));
        assert_eq!(parse_uint("0o17"), Some(15));
        assert_eq!(parse_uint("-1"), None);
        assert_eq!(parse_uint("0x"), None);
    }

    #[test]
    fn test_parse_bool_accepts_go_style_literals() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FlagValue::from("moe").to_string(), "moe");
        assert_eq!(FlagValue::from(true).to_string(), "true");
        assert_eq!(FlagValue::from(-2i64).to_string(), "-2");
        assert_eq!(FlagValue::from(9u64).to_string(), "9");
    }
}
