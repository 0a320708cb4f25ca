//! Named action callbacks that manifests bind to.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cmdtree_core::{Action, Context};

/// Maps action names used in a manifest to callbacks.
///
/// # Examples
///
/// ```
/// use cmdtree_manifest::ActionRegistry;
///
/// let registry = ActionRegistry::new()
///     .with("greet", |ctx| println!("hello {}", ctx.args.get(0)))
///     .with_fallback(|ctx| println!("{} is not implemented", ctx.command));
///
/// assert!(registry.contains("greet"));
/// assert!(registry.resolve("greet").is_some());
/// assert!(registry.resolve("anything-else").is_some());
/// ```
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
    fallback: Option<Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `action` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: &str, action: F)
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.actions.insert(name.to_string(), Arc::new(action));
    }

    pub fn with<F>(mut self, name: &str, action: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.register(name, action);
        self
    }

    /// Sets the callback used for action names that were never registered.
    pub fn set_fallback<F>(&mut self, action: F)
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(action));
    }

    pub fn with_fallback<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.set_fallback(action);
        self
    }

    /// Returns `true` if `name` was registered explicitly.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The callback for `name`: the registered one, else the fallback.
    pub fn resolve(&self, name: &str) -> Option<Action> {
        self.actions
            .get(name)
            .or(self.fallback.as_ref())
            .map(Arc::clone)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_resolve_prefers_registered_action() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (Arc::clone(&hits), Arc::clone(&hits));
        let registry = ActionRegistry::new()
            .with("greet", move |_| a.lock().unwrap().push("greet"))
            .with_fallback(move |_| b.lock().unwrap().push("fallback"));

        let ctx = Context::default();
        (registry.resolve("greet").unwrap())(&ctx);
        (registry.resolve("other").unwrap())(&ctx);
        assert_eq!(*hits.lock().unwrap(), vec!["greet", "fallback"]);
    }

    #[test]
    fn test_resolve_without_fallback() {
        let registry = ActionRegistry::new().with("greet", |_| {});
        assert!(registry.resolve("greet").is_some());
        assert!(registry.resolve("other").is_none());
        assert!(!registry.has_fallback());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ActionRegistry::new();
        registry.register("zeta", |_| {});
        registry.register("alpha", |_| {});
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        assert_eq!(
            format!("{registry:?}"),
            r#"ActionRegistry { actions: ["alpha", "zeta"], fallback: false }"#
        );
    }
}
