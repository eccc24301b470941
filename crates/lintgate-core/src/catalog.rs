//! Analyzer kinds and their factories.
//!
//! A plugin manifest never names Rust types directly. Each declared type
//! carries a `kind`, and the catalog maps that kind to a factory that builds
//! the analyzer from the type's options. A declared type "implements the
//! analyzer capability" exactly when its kind is registered here.

use crate::analyzer::AnalyzerBox;
use crate::types::Severity;
use std::collections::BTreeMap;

/// Everything a factory receives to build one analyzer instance.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSpec<'a> {
    /// Fully qualified name, `<module>::<type>`.
    pub full_name: &'a str,
    /// Type name as declared in the manifest.
    pub type_name: &'a str,
    /// Effective options after `extends` resolution.
    pub options: &'a TypeOptions,
}

impl AnalyzerSpec<'_> {
    /// Returns the `id` option, defaulting to the type name.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is present but not a string.
    pub fn diagnostic_id(&self) -> Result<String, FactoryError> {
        Ok(self.options.get_str("id")?.unwrap_or(self.type_name).to_string())
    }
}

/// Builds an analyzer from its spec.
pub type AnalyzerFactory =
    Box<dyn Fn(&AnalyzerSpec<'_>) -> Result<AnalyzerBox, FactoryError> + Send + Sync>;

struct CatalogEntry {
    description: &'static str,
    factory: AnalyzerFactory,
}

/// Registry of analyzer kinds.
#[derive(Default)]
pub struct AnalyzerCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl AnalyzerCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind. A later registration of the same kind replaces the
    /// earlier one.
    pub fn register<F>(&mut self, kind: impl Into<String>, description: &'static str, factory: F)
    where
        F: Fn(&AnalyzerSpec<'_>) -> Result<AnalyzerBox, FactoryError> + Send + Sync + 'static,
    {
        self.entries.insert(
            kind.into(),
            CatalogEntry {
                description,
                factory: Box::new(factory),
            },
        );
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, kind: impl Into<String>, description: &'static str, factory: F) -> Self
    where
        F: Fn(&AnalyzerSpec<'_>) -> Result<AnalyzerBox, FactoryError> + Send + Sync + 'static,
    {
        self.register(kind, description, factory);
        self
    }

    /// Returns `true` if `kind` is a registered analyzer kind.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Iterates `(kind, description)` pairs in kind order.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries
            .iter()
            .map(|(kind, entry)| (kind.as_str(), entry.description))
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds an analyzer of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is unknown or the factory rejects the spec.
    pub fn instantiate(&self, kind: &str, spec: &AnalyzerSpec<'_>) -> Result<AnalyzerBox, FactoryError> {
        let entry = self
            .entries
            .get(kind)
            .ok_or_else(|| FactoryError::UnknownKind(kind.to_string()))?;
        (entry.factory)(spec)
    }
}

impl std::fmt::Debug for AnalyzerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerCatalog")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Construction options of a declared type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOptions(toml::Table);

impl TypeOptions {
    /// Wraps a TOML table.
    #[must_use]
    pub fn new(table: toml::Table) -> Self {
        Self(table)
    }

    /// Returns these options overlaid on `base`; keys here win.
    #[must_use]
    pub fn overlay_on(&self, base: &Self) -> Self {
        let mut merged = base.0.clone();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }

    /// Returns `true` if the option is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Gets an optional string option.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, FactoryError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| FactoryError::invalid(key, "a string")),
        }
    }

    /// Gets a required string option.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is missing or not a string.
    pub fn require_str(&self, key: &str) -> Result<&str, FactoryError> {
        self.get_str(key)?
            .ok_or_else(|| FactoryError::MissingOption(key.to_string()))
    }

    /// Gets a boolean option with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, FactoryError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| FactoryError::invalid(key, "a boolean")),
        }
    }

    /// Gets a required, non-empty string array option.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is missing, empty, or holds non-strings.
    pub fn require_str_array(&self, key: &str) -> Result<Vec<String>, FactoryError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| FactoryError::MissingOption(key.to_string()))?;
        let items = value
            .as_array()
            .ok_or_else(|| FactoryError::invalid(key, "an array of strings"))?;
        let strings = items
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| FactoryError::invalid(key, "an array of strings"))?;
        if strings.is_empty() {
            return Err(FactoryError::invalid(key, "a non-empty array"));
        }
        Ok(strings)
    }

    /// Gets the `severity` option, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a known severity name.
    pub fn severity(&self, default: Severity) -> Result<Severity, FactoryError> {
        match self.get_str("severity")? {
            None => Ok(default),
            Some(s) => s
                .parse()
                .map_err(|_| FactoryError::invalid("severity", "hidden, info, warning or error")),
        }
    }
}

/// Reasons a factory cannot build an analyzer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// The kind is not registered.
    #[error("unknown analyzer kind `{0}`")]
    UnknownKind(String),

    /// A required option is absent.
    #[error("missing required option `{0}`")]
    MissingOption(String),

    /// An option has the wrong shape.
    #[error("option `{key}` must be {expected}")]
    InvalidOption {
        /// Option name.
        key: String,
        /// What was expected.
        expected: &'static str,
    },
}

impl FactoryError {
    fn invalid(key: &str, expected: &'static str) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisError, Analyzer};
    use crate::compilation::Compilation;
    use crate::types::Diagnostic;

    struct Named(String);

    impl Analyzer for Named {
        fn full_name(&self) -> &str {
            &self.0
        }

        fn analyze(&self, _: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
            Ok(vec![])
        }
    }

    fn options(toml: &str) -> TypeOptions {
        TypeOptions::new(toml::from_str(toml).unwrap())
    }

    fn catalog() -> AnalyzerCatalog {
        AnalyzerCatalog::new().with("named", "Echoes its name", |spec| {
            spec.options.require_str("must")?;
            Ok(Box::new(Named(spec.full_name.to_string())))
        })
    }

    #[test]
    fn instantiates_registered_kind() {
        let opts = options("must = \"x\"");
        let spec = AnalyzerSpec {
            full_name: "m::T",
            type_name: "T",
            options: &opts,
        };
        let analyzer = catalog().instantiate("named", &spec).unwrap();
        assert_eq!(analyzer.full_name(), "m::T");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let opts = TypeOptions::default();
        let spec = AnalyzerSpec {
            full_name: "m::T",
            type_name: "T",
            options: &opts,
        };
        let err = catalog().instantiate("nope", &spec).err().unwrap();
        assert_eq!(err, FactoryError::UnknownKind("nope".to_string()));
    }

    #[test]
    fn factory_errors_propagate() {
        let opts = TypeOptions::default();
        let spec = AnalyzerSpec {
            full_name: "m::T",
            type_name: "T",
            options: &opts,
        };
        let err = catalog().instantiate("named", &spec).err().unwrap();
        assert_eq!(err, FactoryError::MissingOption("must".to_string()));
    }

    #[test]
    fn overlay_prefers_derived_keys() {
        let base = options("a = 1\nb = 2");
        let derived = options("b = 3");
        let merged = derived.overlay_on(&base);
        assert!(merged.contains("a"));
        assert_eq!(merged, options("a = 1\nb = 3"));
    }

    #[test]
    fn typed_getters_validate_shapes() {
        let opts = options("flag = \"yes\"\nlist = []\nseverity = \"loud\"");
        assert!(opts.get_bool("flag", false).is_err());
        assert!(opts.get_bool("absent", true).unwrap());
        assert!(opts.require_str_array("list").is_err());
        assert!(opts.severity(Severity::Warning).is_err());
        assert_eq!(
            options("").severity(Severity::Warning),
            Ok(Severity::Warning)
        );
    }

    #[test]
    fn diagnostic_id_defaults_to_type_name() {
        let opts = TypeOptions::default();
        let spec = AnalyzerSpec {
            full_name: "m::T",
            type_name: "T",
            options: &opts,
        };
        assert_eq!(spec.diagnostic_id().unwrap(), "T");
    }
}
