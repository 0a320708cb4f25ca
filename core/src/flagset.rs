//! The parse target that flag declarations register into.
//!
//! A [`FlagSet`] is built fresh for every dispatch from the resolved
//! command's own declarations. It knows each flag's kind and default and
//! records the values assigned while the tokens are consumed.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{CliError, Result};
use crate::flag::{FlagKind, FlagValue};

/// Resolved flag values keyed by flag name.
pub type FlagMap = BTreeMap<String, FlagValue>;

#[derive(Debug, Clone)]
struct Slot {
    default: FlagValue,
    value: Option<FlagValue>,
    usage: String,
}

/// Mutable registry of declared flags for one dispatch.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    slots: BTreeMap<String, Slot>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a flag with its default value.
    ///
    /// A second declaration under the same name is ignored: the first
    /// declared flag wins.
    pub fn define(&mut self, name: &str, default: FlagValue, usage: &str) {
        if self.slots.contains_key(name) {
            warn!(flag = name, "flag declared twice; keeping first declaration");
            return;
        }
        self.slots.insert(
            name.to_string(),
            Slot {
                default,
                value: None,
                usage: usage.to_string(),
            },
        );
    }

    /// Returns `true` if a flag with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Returns the declared kind of a flag.
    pub fn kind(&self, name: &str) -> Option<FlagKind> {
        self.slots.get(name).map(|slot| slot.default.kind())
    }

    /// Returns the usage text of a flag.
    pub fn usage(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(|slot| slot.usage.as_str())
    }

    /// Assigns raw text to a declared flag, parsed per its kind.
    ///
    /// # Errors
    ///
    /// [`CliError::FlagNotFound`] when the flag is not declared,
    /// [`CliError::InvalidFlagValue`] when `raw` does not fit its kind.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| CliError::FlagNotFound(name.to_string()))?;
        let kind = slot.default.kind();
        let parsed = kind.parse(raw).ok_or_else(|| CliError::InvalidFlagValue {
            flag: name.to_string(),
            value: raw.to_string(),
            kind,
        })?;
        slot.value = Some(parsed);
        Ok(())
    }

    /// Returns the explicitly assigned value, if the input set one.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.slots.get(name).and_then(|slot| slot.value.as_ref())
    }

    /// Returns the assigned value, falling back to the declared default.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.slots
            .get(name)
            .map(|slot| slot.value.as_ref().unwrap_or(&slot.default))
    }

    /// Returns `true` if the input assigned this flag.
    pub fn was_set(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// Names of all declared flags, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Number of declared flags.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no flags are declared.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlagSet {
        let mut set = FlagSet::new();
        set.define("m", FlagValue::from("moe"), "message");
        set.define("dl", FlagValue::from(false), "download");
        set.define("n", FlagValue::from(0i64), "count");
        set
    }

    #[test]
    fn test_get_falls_back_to_default() {
        let set = sample();
        assert_eq!(set.get("m"), Some(&FlagValue::from("moe")));
        assert_eq!(set.value("m"), None);
        assert!(!set.was_set("m"));
        assert_eq!(set.get("nope"), None);
    }

    #[test]
    fn test_set_parses_per_kind() {
        let mut set = sample();
        set.set("n", "-12").unwrap();
        set.set("dl", "true").unwrap();
        assert_eq!(set.get("n"), Some(&FlagValue::Int(-12)));
        assert_eq!(set.get("dl"), Some(&FlagValue::Bool(true)));
        assert!(set.was_set("n"));
    }

    #[test]
    fn test_set_unknown_flag() {
        let mut set = sample();
        let err = set.set("x", "1").unwrap_err();
        assert!(matches!(err, CliError::FlagNotFound(name) if name == "x"));
    }

    #[test]
    fn test_set_rejects_mistyped_value() {
        let mut set = sample();
        let err = set.set("n", "ten").unwrap_err();
        assert!(matches!(
            err,
            CliError::InvalidFlagValue { kind: FlagKind::Int, .. }
        ));
        assert_eq!(set.get("n"), Some(&FlagValue::Int(0)));
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut set = sample();
        set.define("m", FlagValue::from(true), "shadow");
        assert_eq!(set.kind("m"), Some(FlagKind::String));
        assert_eq!(set.usage("m"), Some("message"));
        assert_eq!(set.len(), 3);
    }
}
