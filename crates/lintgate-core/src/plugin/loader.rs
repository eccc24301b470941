//! Manifest loading, dependency resolution and analyzer discovery.

use crate::analyzer::AnalyzerBox;
use crate::catalog::{AnalyzerCatalog, AnalyzerSpec, FactoryError, TypeOptions};

use super::manifest::PluginManifestDto;
use super::module::{ManifestError, ModuleIdentity, PluginModule, TypeDecl};
use super::modules::ModuleRegistry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Errors that abort plugin loading.
#[derive(Debug, thiserror::Error)]
pub enum PluginLoadError {
    /// The manifest file cannot be read.
    #[error("failed to read plugin {path}: {source}")]
    Read {
        /// Manifest path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or has the wrong shape.
    #[error("malformed plugin manifest {path}: {message}")]
    Parse {
        /// Manifest path.
        path: PathBuf,
        /// Deserializer message.
        message: String,
    },

    /// The manifest parsed but failed validation.
    #[error("invalid plugin manifest {path}: {source}")]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Validation error.
        source: ManifestError,
    },

    /// A module (transitively) requires itself.
    #[error("dependency cycle through {path}")]
    DependencyCycle {
        /// Manifest path reached twice.
        path: PathBuf,
    },

    /// Neither the file lookup nor the short-name fallback found a dependency.
    #[error("module `{module}` requires `{dependency}`, which could not be resolved")]
    UnresolvedDependency {
        /// Requiring module.
        module: String,
        /// Requested reference.
        dependency: String,
    },

    /// An `extends` reference names a type that does not exist.
    #[error("type `{type_name}` extends unknown type `{base}`")]
    UnknownBaseType {
        /// Derived type, `module::Type`.
        type_name: String,
        /// Base reference as written.
        base: String,
    },

    /// A chain of `extends` loops back on itself.
    #[error("type `{type_name}` inherits from itself")]
    InheritanceCycle {
        /// A type on the cycle, `module::Type`.
        type_name: String,
    },

    /// The factory for an analyzer type rejected its options.
    #[error("cannot instantiate analyzer `{type_name}` from {path}: {source}")]
    Instantiate {
        /// Analyzer full name.
        type_name: String,
        /// Manifest path.
        path: PathBuf,
        /// Factory error.
        source: FactoryError,
    },
}

/// Loads plugin manifests and instantiates the analyzers they declare.
///
/// Dependencies named in `requires` are resolved in two steps. First the
/// file `<short name>.toml` next to the requiring manifest is tried; it is
/// accepted only if its identity matches exactly. Failing that, the
/// short-name fallback picks the first module in the loader's
/// [`ModuleRegistry`] with that short name: anything loaded earlier in this
/// run, plus whatever the registry held when it was handed to
/// [`PluginLoader::with_modules`].
pub struct PluginLoader<'c> {
    catalog: &'c AnalyzerCatalog,
    modules: ModuleRegistry,
    loading: Vec<PathBuf>,
}

impl<'c> PluginLoader<'c> {
    /// Creates a loader with an empty module registry.
    #[must_use]
    pub fn new(catalog: &'c AnalyzerCatalog) -> Self {
        Self::with_modules(catalog, ModuleRegistry::new())
    }

    /// Creates a loader that resolves against an existing module registry.
    #[must_use]
    pub fn with_modules(catalog: &'c AnalyzerCatalog, modules: ModuleRegistry) -> Self {
        Self {
            catalog,
            modules,
            loading: Vec::new(),
        }
    }

    /// Modules loaded so far, including any the registry started with.
    #[must_use]
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Loads one plugin manifest and instantiates every concrete analyzer
    /// type it declares, in declaration order.
    ///
    /// Loading the same manifest twice reuses the module but yields fresh
    /// analyzer instances.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or any dependency cannot be loaded,
    /// or if an analyzer type cannot be instantiated.
    pub fn load_plugin(&mut self, path: &Path) -> Result<Vec<AnalyzerBox>, PluginLoadError> {
        let module = self.load_module(path)?;
        let analyzers = self.discover(&module)?;
        info!(
            "Loaded {} analyzer(s) from {}",
            analyzers.len(),
            module.identity()
        );
        Ok(analyzers)
    }

    fn load_module(&mut self, path: &Path) -> Result<Arc<PluginModule>, PluginLoadError> {
        let canonical = canonicalize(path)?;
        if let Some(module) = self.modules.by_path(&canonical) {
            debug!("Reusing loaded module {}", module.identity());
            return Ok(module);
        }

        let module = read_module(&canonical)?;
        self.register(module)
    }

    fn register(&mut self, mut module: PluginModule) -> Result<Arc<PluginModule>, PluginLoadError> {
        let path = module.path().to_path_buf();
        if self.loading.contains(&path) {
            return Err(PluginLoadError::DependencyCycle { path });
        }

        self.loading.push(path);
        let resolved = module
            .requires()
            .iter()
            .map(|dep| self.resolve_dependency(&module, dep))
            .collect::<Result<Vec<_>, _>>();
        self.loading.pop();

        module.dependencies = resolved?;
        debug!("Registered module {}", module.identity());
        Ok(self.modules.insert(module))
    }

    fn resolve_dependency(
        &mut self,
        requester: &PluginModule,
        dep: &ModuleIdentity,
    ) -> Result<Arc<PluginModule>, PluginLoadError> {
        let dir = requester.path().parent().unwrap_or_else(|| Path::new("."));
        let candidate = dir.join(format!("{}.toml", dep.short_name()));
        if let Some(module) = self.load_exact(&candidate, dep)? {
            return Ok(module);
        }

        if let Some(module) = self.modules.by_short_name(dep.short_name()) {
            debug!(
                "Resolved `{dep}` to loaded module {} by short name",
                module.identity()
            );
            return Ok(module);
        }

        Err(PluginLoadError::UnresolvedDependency {
            module: requester.identity().to_string(),
            dependency: dep.to_string(),
        })
    }

    /// Loads `candidate` only if it exists and exactly satisfies `dep`.
    fn load_exact(
        &mut self,
        candidate: &Path,
        dep: &ModuleIdentity,
    ) -> Result<Option<Arc<PluginModule>>, PluginLoadError> {
        if !candidate.is_file() {
            return Ok(None);
        }

        let canonical = canonicalize(candidate)?;
        if let Some(module) = self.modules.by_path(&canonical) {
            return Ok(module.identity().satisfies(dep).then_some(module));
        }

        let module = read_module(&canonical)?;
        if !module.identity().satisfies(dep) {
            debug!(
                "{} does not satisfy `{dep}`, trying loaded modules",
                module.identity()
            );
            return Ok(None);
        }

        self.register(module).map(Some)
    }

    fn discover(&self, module: &PluginModule) -> Result<Vec<AnalyzerBox>, PluginLoadError> {
        let mut analyzers = Vec::new();

        for decl in module.types() {
            let full_name = format!("{}::{}", module.name(), decl.name);

            if decl.is_abstract {
                debug!("Skipping abstract type {full_name}");
                continue;
            }

            let (kind, options) = resolve_type(module, decl, &mut HashSet::new())?;
            let Some(kind) = kind else {
                debug!("Skipping {full_name}: not an analyzer");
                continue;
            };
            if !self.catalog.contains(&kind) {
                warn!("Skipping {full_name}: unknown analyzer kind `{kind}`");
                continue;
            }

            let spec = AnalyzerSpec {
                full_name: &full_name,
                type_name: &decl.name,
                options: &options,
            };
            let analyzer = self.catalog.instantiate(&kind, &spec).map_err(|source| {
                PluginLoadError::Instantiate {
                    type_name: full_name.clone(),
                    path: module.path().to_path_buf(),
                    source,
                }
            })?;

            debug!("Discovered analyzer {full_name} ({kind})");
            analyzers.push(analyzer);
        }

        Ok(analyzers)
    }
}

/// Follows `extends` to the effective kind and options of a type.
fn resolve_type(
    module: &PluginModule,
    decl: &TypeDecl,
    visited: &mut HashSet<String>,
) -> Result<(Option<String>, TypeOptions), PluginLoadError> {
    let type_name = format!("{}::{}", module.name(), decl.name);
    if !visited.insert(type_name.clone()) {
        return Err(PluginLoadError::InheritanceCycle { type_name });
    }

    let Some(base_ref) = &decl.extends else {
        return Ok((decl.kind.clone(), decl.options.clone()));
    };

    let unknown = || PluginLoadError::UnknownBaseType {
        type_name: type_name.clone(),
        base: base_ref.to_string(),
    };

    let base_module = match base_ref.module.as_deref() {
        None => module,
        Some(name) if name == module.name() => module,
        Some(name) => module
            .dependencies()
            .iter()
            .find(|d| d.name() == name)
            .map(Arc::as_ref)
            .ok_or_else(unknown)?,
    };
    let base_decl = base_module.type_decl(&base_ref.name).ok_or_else(unknown)?;

    let (base_kind, base_options) = resolve_type(base_module, base_decl, visited)?;
    Ok((
        decl.kind.clone().or(base_kind),
        decl.options.overlay_on(&base_options),
    ))
}

fn canonicalize(path: &Path) -> Result<PathBuf, PluginLoadError> {
    std::fs::canonicalize(path).map_err(|source| PluginLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_module(path: &Path) -> Result<PluginModule, PluginLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| PluginLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dto: PluginManifestDto = toml::from_str(&content).map_err(|e| PluginLoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    PluginModule::from_dto(dto, path).map_err(|source| PluginLoadError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(toml: &str) -> PluginModule {
        let dto: PluginManifestDto = toml::from_str(toml).expect("fixture should parse");
        PluginModule::from_dto(dto, "/virtual/m.toml").expect("fixture should validate")
    }

    #[test]
    fn resolve_type_merges_base_options() {
        let m = module(
            r#"
[module]
name = "m"

[[types]]
name = "Base"
kind = "text-pattern"
abstract = true
[types.options]
pattern = "TODO"
severity = "info"

[[types]]
name = "Derived"
extends = "Base"
[types.options]
severity = "error"
"#,
        );
        let decl = m.type_decl("Derived").unwrap();
        let (kind, options) = resolve_type(&m, decl, &mut HashSet::new()).unwrap();

        assert_eq!(kind.as_deref(), Some("text-pattern"));
        assert_eq!(options.require_str("pattern").unwrap(), "TODO");
        assert_eq!(options.get_str("severity").unwrap(), Some("error"));
    }

    #[test]
    fn resolve_type_detects_cycles() {
        let m = module(
            r#"
[module]
name = "m"

[[types]]
name = "A"
extends = "B"

[[types]]
name = "B"
extends = "m::A"
"#,
        );
        let err = resolve_type(&m, m.type_decl("A").unwrap(), &mut HashSet::new()).unwrap_err();
        assert!(matches!(err, PluginLoadError::InheritanceCycle { .. }));
    }

    #[test]
    fn resolve_type_rejects_unknown_base() {
        let m = module(
            r#"
[module]
name = "m"

[[types]]
name = "A"
extends = "other::Base"
"#,
        );
        let err = resolve_type(&m, m.type_decl("A").unwrap(), &mut HashSet::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type `m::A` extends unknown type `other::Base`"
        );
    }
}
