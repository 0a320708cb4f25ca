//! Declarative manifests for `cmdtree` applications.
//!
//! A manifest describes an application tree (commands, aliases, flags,
//! help text) in YAML or JSON. Actions are referred to by name and bound to
//! callbacks through an [`ActionRegistry`] when the manifest is built into a
//! [`cmdtree_core::App`].
//!
//! # Quick start
//!
//! ```no_run
//! use cmdtree_manifest::{ActionRegistry, AppManifest};
//!
//! let manifest = AppManifest::load("uwe.yaml").unwrap();
//! let registry = ActionRegistry::new()
//!     .with("run", |ctx| println!("running with m={}", ctx.string().get("m")));
//!
//! let app = manifest.build(&registry).unwrap();
//! let args: Vec<String> = std::env::args().collect();
//! app.run(&args).unwrap();
//! ```

mod error;
mod manifest;
mod registry;

pub use error::{ManifestError, Result};
pub use manifest::{AppManifest, CommandManifest, DefaultValue, FlagManifest, ManifestFormat};
pub use registry::ActionRegistry;
