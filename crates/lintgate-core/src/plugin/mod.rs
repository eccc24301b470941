//! Analyzer plugins described by TOML manifests.
//!
//! A plugin module is a manifest file on disk. It names itself, lists the
//! modules it depends on, and declares types. Concrete types whose kind is
//! registered in the [`AnalyzerCatalog`](crate::AnalyzerCatalog) become
//! analyzer instances.
//!
//! # Architecture
//!
//! ```text
//! manifest.toml
//!   ↓ serde (DTO layer)
//! manifest types
//!   ↓ validate + convert
//! PluginModule ──requires──▶ PluginModule (ModuleRegistry)
//!   ↓ PluginLoader::load_plugin()
//! Vec<AnalyzerBox>
//! ```

pub mod loader;
pub mod manifest;
pub mod module;
pub mod modules;

pub use loader::{PluginLoadError, PluginLoader};
pub use module::{ManifestError, ModuleIdentity, PluginModule, TypeDecl, TypeRef};
pub use modules::ModuleRegistry;
