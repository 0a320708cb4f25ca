//! The parse context handed to an action, and typed views over its flags.
//!
//! Getters never fail: a missing or mistyped key yields the zero value of the
//! requested type.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Args, Context, FlagValue};
//!
//! let mut ctx = Context::new("run", Args::from(vec!["a.txt".to_string()]));
//! ctx.set_flag("m", "32");
//! ctx.set_flag("dl", true);
//!
//! assert_eq!(ctx.string().get("m"), "32");
//! assert!(ctx.bool().get("dl"));
//! assert_eq!(ctx.int().get("m"), 0); // mistyped
//! assert_eq!(ctx.uint().get("absent"), 0);
//! assert_eq!(ctx.args.get(0), "a.txt");
//! assert_eq!(ctx.args.get(5), "");
//! ```

use std::marker::PhantomData;

use serde::Serialize;

use crate::flag::FlagValue;
use crate::flagset::FlagMap;

/// Positional arguments left over after flag parsing, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Args(Vec<String>);

impl Args {
    /// Returns the argument at `index`, or `""` when out of range.
    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }

    /// Length in bytes of the argument at `index`, or 0 when out of range.
    pub fn len_at(&self, index: usize) -> usize {
        self.0.get(index).map_or(0, String::len)
    }

    /// Number of arguments.
    pub fn num(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything an action receives for one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Context {
    /// Name of the command that was resolved.
    pub command: String,
    /// Positional arguments.
    pub args: Args,
    /// Every declared flag of the command, explicitly set or defaulted.
    pub flags: FlagMap,
}

impl Context {
    pub fn new(command: &str, args: Args) -> Self {
        Self {
            command: command.to_string(),
            args,
            flags: FlagMap::new(),
        }
    }

    /// Overrides or inserts a flag value.
    pub fn set_flag(&mut self, name: &str, value: impl Into<FlagValue>) {
        self.flags.insert(name.to_string(), value.into());
    }

    /// Returns the raw resolved value of a flag.
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    pub fn string(&self) -> FlagAccessor<'_, String> {
        FlagAccessor::new(&self.flags)
    }

    pub fn bool(&self) -> FlagAccessor<'_, bool> {
        FlagAccessor::new(&self.flags)
    }

    pub fn int(&self) -> FlagAccessor<'_, i64> {
        FlagAccessor::new(&self.flags)
    }

    pub fn uint(&self) -> FlagAccessor<'_, u64> {
        FlagAccessor::new(&self.flags)
    }
}

/// Rust types that can be read out of a [`FlagValue`].
pub trait FlagType: Default {
    fn from_flag_value(value: &FlagValue) -> Option<Self>;
}

impl FlagType for String {
    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FlagType for bool {
    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FlagType for i64 {
    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FlagType for u64 {
    fn from_flag_value(value: &FlagValue) -> Option<Self> {
        match value {
            FlagValue::Uint(u) => Some(*u),
            _ => None,
        }
    }
}

/// Typed, read-only view over a resolved flag map.
#[derive(Debug, Clone, Copy)]
pub struct FlagAccessor<'a, T> {
    flags: &'a FlagMap,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: FlagType> FlagAccessor<'a, T> {
    pub fn new(flags: &'a FlagMap) -> Self {
        Self {
            flags,
            _marker: PhantomData,
        }
    }

    /// Returns the value of `name`, or the zero value when it is absent or
    /// holds another type.
    pub fn get(&self, name: &str) -> T {
        self.try_get(name).unwrap_or_default()
    }

    /// Returns the value of `name` only if present with the right type.
    pub fn try_get(&self, name: &str) -> Option<T> {
        self.flags.get(name).and_then(T::from_flag_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_accessors() {
        let args = Args::from(vec!["one".to_string(), "three".to_string()]);
        assert_eq!(args.num(), 2);
        assert_eq!(args.len_at(1), 5);
        assert_eq!(args.len_at(9), 0);
        assert_eq!(args.get(1), "three");
        assert_eq!(args.as_slice().len(), 2);
    }

    #[test]
    fn test_accessors_return_zero_on_mismatch() {
        let mut ctx = Context::default();
        ctx.set_flag("n", 5i64);
        ctx.set_flag("u", 5u64);

        assert_eq!(ctx.int().get("n"), 5);
        assert_eq!(ctx.uint().get("n"), 0);
        assert_eq!(ctx.uint().get("u"), 5);
        assert_eq!(ctx.string().get("n"), "");
        assert!(!ctx.bool().get("n"));
        assert_eq!(ctx.int().try_get("u"), None);
    }

    #[test]
    fn test_set_flag_overwrites() {
        let mut ctx = Context::default();
        ctx.set_flag("m", "moe");
        ctx.set_flag("m", "32");
        assert_eq!(ctx.string().get("m"), "32");
        assert_eq!(ctx.flags.len(), 1);
    }
}
