//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to [`PluginModule`](super::module::PluginModule) by
//! [`PluginModule::from_dto`](super::module::PluginModule::from_dto).

use serde::Deserialize;

/// Raw TOML representation of a plugin manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifestDto {
    /// The `[module]` header.
    pub module: ModuleDto,

    /// Declared types, in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDto>,
}

/// TOML representation of the `[module]` header.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDto {
    /// Module short name (e.g., "acme-lints").
    pub name: String,
    /// Module version.
    #[serde(default)]
    pub version: Option<String>,
    /// Dependencies as `"name"` or `"name, version=X"`.
    #[serde(default)]
    pub requires: Vec<String>,
}

/// TOML representation of a `[[types]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDto {
    /// Type name, unique within the module.
    pub name: String,
    /// Analyzer kind; absent for helper types.
    #[serde(default)]
    pub kind: Option<String>,
    /// Base type, `"Type"` or `"module::Type"`.
    #[serde(default)]
    pub extends: Option<String>,
    /// Abstract types are never instantiated.
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
    /// Kind-specific construction options.
    #[serde(default)]
    pub options: toml::Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let dto: PluginManifestDto = toml::from_str(
            r#"
[module]
name = "acme-lints"
version = "1.2.0"
requires = ["acme-base, version=1.0"]

[[types]]
name = "Base"
kind = "text-pattern"
abstract = true

[[types]]
name = "NoTodo"
extends = "Base"
[types.options]
pattern = "TODO"
"#,
        )
        .expect("manifest should parse");

        assert_eq!(dto.module.name, "acme-lints");
        assert_eq!(dto.module.version.as_deref(), Some("1.2.0"));
        assert_eq!(dto.module.requires, vec!["acme-base, version=1.0"]);
        assert_eq!(dto.types.len(), 2);
        assert!(dto.types[0].is_abstract);
        assert_eq!(dto.types[1].extends.as_deref(), Some("Base"));
        assert!(dto.types[1].options.contains_key("pattern"));
    }

    #[test]
    fn module_header_is_required() {
        let result: Result<PluginManifestDto, _> = toml::from_str("[[types]]\nname = \"X\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_type_fields_are_rejected() {
        let result: Result<PluginManifestDto, _> = toml::from_str(
            "[module]\nname = \"m\"\n[[types]]\nname = \"X\"\nknd = \"typo\"\n",
        );
        assert!(result.is_err());
    }
}
