//! # lintgate-analyzers
//!
//! Built-in analyzer kinds for lintgate plugin manifests.
//!
//! A plugin type picks one of these with its `kind` and configures it through
//! `[types.options]`.
//!
//! ## Available Kinds
//!
//! | Kind | Required options | Description |
//! |------|------------------|-------------|
//! | `method-call` | `methods` | Flags `.method()` calls, skipping test code by default |
//! | `restricted-use` | `deny` | Flags `use` imports matching `::` path patterns |
//! | `text-pattern` | `pattern` | Flags source lines containing a substring |
//! | `required-file` | `path` | Project-wide finding when a file is missing |
//!
//! Every kind also accepts `severity` (`hidden`, `info`, `warning`, `error`;
//! default `warning`) and `id` (default: the type name).
//!
//! ## Usage
//!
//! ```ignore
//! use lintgate_analyzers::builtin_catalog;
//! use lintgate_core::PluginLoader;
//!
//! let catalog = builtin_catalog();
//! let mut loader = PluginLoader::new(&catalog);
//! let analyzers = loader.load_plugin("rules/acme.toml".as_ref())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod method_call;
mod required_file;
mod restricted_use;
mod syntax;
mod text_pattern;

pub use catalog::builtin_catalog;
pub use method_call::MethodCall;
pub use required_file::RequiredFile;
pub use restricted_use::RestrictedUse;
pub use text_pattern::TextPattern;
