//! Validated plugin module model.

use crate::catalog::TypeOptions;

use super::manifest::{PluginManifestDto, TypeDto};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Validation errors for a plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    /// A name field is empty or blank.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// Two types share a name.
    #[error("duplicate type `{0}`")]
    DuplicateType(String),

    /// A `requires` entry cannot be parsed.
    #[error("invalid module reference `{0}`")]
    InvalidIdentity(String),

    /// An `extends` value cannot be parsed.
    #[error("invalid type reference `{0}`")]
    InvalidTypeRef(String),
}

/// Module identity, written `"name"` or `"name, version=X"`.
///
/// Extra `key=value` segments are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    name: String,
    version: Option<String>,
}

impl ModuleIdentity {
    /// Creates an identity from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parses the `"name, version=X"` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or a segment is not `key=value`.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut parts = text.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(ManifestError::InvalidIdentity(text.to_string()));
        }

        let mut version = None;
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ManifestError::InvalidIdentity(text.to_string()))?;
            if key.trim().eq_ignore_ascii_case("version") {
                version = Some(value.trim().to_string());
            }
        }

        Ok(Self::new(name, version))
    }

    /// The short name, used by the resolution fallback.
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// The declared or requested version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns `true` if `self`, as a loaded module, exactly satisfies the
    /// `requested` reference. An unversioned request matches any version.
    #[must_use]
    pub fn satisfies(&self, requested: &Self) -> bool {
        self.name == requested.name
            && requested
                .version
                .as_ref()
                .map_or(true, |v| self.version.as_ref() == Some(v))
    }
}

impl std::fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}, version={v}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Reference to a base type: `"Type"` or `"module::Type"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Owning module short name; `None` means the declaring module.
    pub module: Option<String>,
    /// Type name.
    pub name: String,
}

impl TypeRef {
    /// Parses a type reference.
    ///
    /// # Errors
    ///
    /// Returns an error if either side of `::` is empty.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let invalid = || ManifestError::InvalidTypeRef(text.to_string());
        match text.rsplit_once("::") {
            Some((module, name)) => {
                let (module, name) = (module.trim(), name.trim());
                if module.is_empty() || name.is_empty() {
                    return Err(invalid());
                }
                Ok(Self {
                    module: Some(module.to_string()),
                    name: name.to_string(),
                })
            }
            None if text.trim().is_empty() => Err(invalid()),
            None => Ok(Self {
                module: None,
                name: text.trim().to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.module {
            Some(m) => write!(f, "{m}::{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A type declared by a plugin module.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Type name.
    pub name: String,
    /// Analyzer kind, if declared directly.
    pub kind: Option<String>,
    /// Base type.
    pub extends: Option<TypeRef>,
    /// Abstract types are skipped by discovery.
    pub is_abstract: bool,
    /// Options declared directly on this type.
    pub options: TypeOptions,
}

impl TypeDecl {
    fn from_dto(dto: TypeDto) -> Result<Self, ManifestError> {
        if dto.name.trim().is_empty() {
            return Err(ManifestError::EmptyName("types.name"));
        }
        let extends = dto.extends.as_deref().map(TypeRef::parse).transpose()?;
        Ok(Self {
            name: dto.name,
            kind: dto.kind.filter(|k| !k.trim().is_empty()),
            extends,
            is_abstract: dto.is_abstract,
            options: TypeOptions::new(dto.options),
        })
    }
}

/// A loaded plugin module.
#[derive(Debug)]
pub struct PluginModule {
    identity: ModuleIdentity,
    path: PathBuf,
    requires: Vec<ModuleIdentity>,
    types: Vec<TypeDecl>,
    pub(crate) dependencies: Vec<Arc<PluginModule>>,
}

impl PluginModule {
    /// Validates a manifest DTO.
    ///
    /// # Errors
    ///
    /// Returns the first validation error.
    pub fn from_dto(dto: PluginManifestDto, path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        if dto.module.name.trim().is_empty() {
            return Err(ManifestError::EmptyName("module.name"));
        }
        let identity = ModuleIdentity::new(dto.module.name.trim(), dto.module.version);

        let requires = dto
            .module
            .requires
            .iter()
            .map(|r| ModuleIdentity::parse(r))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let types = dto
            .types
            .into_iter()
            .map(|t| {
                if !seen.insert(t.name.clone()) {
                    return Err(ManifestError::DuplicateType(t.name));
                }
                TypeDecl::from_dto(t)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            identity,
            path: path.into(),
            requires,
            types,
            dependencies: Vec::new(),
        })
    }

    /// Module identity.
    #[must_use]
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Module short name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity.short_name()
    }

    /// Canonical manifest path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared dependencies.
    #[must_use]
    pub fn requires(&self) -> &[ModuleIdentity] {
        &self.requires
    }

    /// Declared types, in declaration order.
    #[must_use]
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Looks up a declared type.
    #[must_use]
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolved dependency modules, in `requires` order.
    #[must_use]
    pub fn dependencies(&self) -> &[Arc<PluginModule>] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(toml: &str) -> PluginManifestDto {
        toml::from_str(toml).expect("fixture should parse")
    }

    #[test]
    fn identity_parses_name_and_version() {
        let id = ModuleIdentity::parse("acme-base, version=1.0, culture=neutral").unwrap();
        assert_eq!(id.short_name(), "acme-base");
        assert_eq!(id.version(), Some("1.0"));
        assert_eq!(id.to_string(), "acme-base, version=1.0");
    }

    #[test]
    fn identity_rejects_empty_name_and_bare_segments() {
        assert!(ModuleIdentity::parse("").is_err());
        assert!(ModuleIdentity::parse(" , version=1").is_err());
        assert!(ModuleIdentity::parse("acme, 1.0").is_err());
    }

    #[test]
    fn satisfies_requires_exact_version_only_when_requested() {
        let loaded = ModuleIdentity::new("acme", Some("2.0".into()));
        assert!(loaded.satisfies(&ModuleIdentity::parse("acme").unwrap()));
        assert!(loaded.satisfies(&ModuleIdentity::parse("acme, version=2.0").unwrap()));
        assert!(!loaded.satisfies(&ModuleIdentity::parse("acme, version=1.0").unwrap()));
        assert!(!loaded.satisfies(&ModuleIdentity::parse("other").unwrap()));
    }

    #[test]
    fn type_ref_forms() {
        assert_eq!(
            TypeRef::parse("Base").unwrap(),
            TypeRef {
                module: None,
                name: "Base".into()
            }
        );
        assert_eq!(
            TypeRef::parse("acme-base::Base").unwrap(),
            TypeRef {
                module: Some("acme-base".into()),
                name: "Base".into()
            }
        );
        assert!(TypeRef::parse("::Base").is_err());
        assert!(TypeRef::parse("acme::").is_err());
    }

    #[test]
    fn from_dto_rejects_duplicate_types() {
        let err = PluginModule::from_dto(
            dto("[module]\nname = \"m\"\n[[types]]\nname = \"A\"\n[[types]]\nname = \"A\"\n"),
            "m.toml",
        )
        .unwrap_err();
        assert_eq!(err, ManifestError::DuplicateType("A".into()));
    }

    #[test]
    fn from_dto_rejects_blank_module_name() {
        let err = PluginModule::from_dto(dto("[module]\nname = \"  \"\n"), "m.toml").unwrap_err();
        assert_eq!(err, ManifestError::EmptyName("module.name"));
    }

    #[test]
    fn from_dto_keeps_declaration_order() {
        let module = PluginModule::from_dto(
            dto(r#"
[module]
name = "m"
requires = ["base"]

[[types]]
name = "Z"
kind = "k"

[[types]]
name = "A"
abstract = true
"#),
            "m.toml",
        )
        .unwrap();

        let names: Vec<&str> = module.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A"]);
        assert_eq!(module.requires()[0].short_name(), "base");
        assert!(module.type_decl("A").is_some_and(|t| t.is_abstract));
    }
}
