//! Registry of already-loaded plugin modules.

use super::module::PluginModule;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Every module loaded so far, in load order.
///
/// The loader owns one of these for its whole lifetime and consults it both
/// to avoid loading a manifest twice and to resolve dependencies by short
/// name. Pass a pre-populated registry to [`PluginLoader::with_modules`]
/// to make extra modules resolvable.
///
/// [`PluginLoader::with_modules`]: super::PluginLoader::with_modules
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<PluginModule>>,
    by_path: HashMap<PathBuf, usize>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module and returns the shared handle.
    pub fn insert(&mut self, module: PluginModule) -> Arc<PluginModule> {
        let module = Arc::new(module);
        self.by_path
            .insert(module.path().to_path_buf(), self.modules.len());
        self.modules.push(Arc::clone(&module));
        module
    }

    /// Looks up a module by its canonical manifest path.
    #[must_use]
    pub fn by_path(&self, path: &Path) -> Option<Arc<PluginModule>> {
        self.by_path
            .get(path)
            .map(|&i| Arc::clone(&self.modules[i]))
    }

    /// Finds the first loaded module with the given short name.
    #[must_use]
    pub fn by_short_name(&self, name: &str) -> Option<Arc<PluginModule>> {
        self.modules.iter().find(|m| m.name() == name).cloned()
    }

    /// Number of loaded modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
