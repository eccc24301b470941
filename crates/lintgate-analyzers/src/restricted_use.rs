//! `restricted-use`: flags `use` imports matching deny patterns.
//!
//! Grouped imports are flattened first, so `use sqlx::{Pool, query};` is
//! checked as `sqlx::Pool` and `sqlx::query`. Patterns follow `::` segments:
//! `*` matches one segment, `**` any number.
//!
//! # Options
//!
//! - `deny` (required): path patterns, e.g. `["sqlx::**", "std::process::exit"]`
//! - `message`: diagnostic text, `{path}` is replaced by the import path
//! - `severity`, `id`

use crate::syntax::{flatten_use_tree, path_matches};
use lintgate_core::{
    AnalysisError, Analyzer, AnalyzerSpec, Compilation, Diagnostic, FactoryError, Location,
    Severity, SourceUnit,
};
use syn::visit::Visit;

/// Kind name in plugin manifests.
pub const KIND: &str = "restricted-use";

/// One-line summary shown by `--list-kinds`.
pub const DESCRIPTION: &str = "Flags `use` imports matching deny patterns";

const DEFAULT_MESSAGE: &str = "use of `{path}` is restricted";

/// Flags imports whose flattened path matches a deny pattern.
#[derive(Debug, Clone)]
pub struct RestrictedUse {
    full_name: String,
    id: String,
    severity: Severity,
    deny: Vec<String>,
    message: String,
}

impl RestrictedUse {
    /// Builds the analyzer from manifest options.
    ///
    /// # Errors
    ///
    /// Returns an error if `deny` is missing or an option is mistyped.
    pub fn from_spec(spec: &AnalyzerSpec<'_>) -> Result<Self, FactoryError> {
        Ok(Self {
            full_name: spec.full_name.to_string(),
            id: spec.diagnostic_id()?,
            severity: spec.options.severity(Severity::Warning)?,
            deny: spec.options.require_str_array("deny")?,
            message: spec
                .options
                .get_str("message")?
                .unwrap_or(DEFAULT_MESSAGE)
                .to_string(),
        })
    }

    fn is_denied(&self, path: &str) -> bool {
        self.deny.iter().any(|pattern| path_matches(path, pattern))
    }
}

impl Analyzer for RestrictedUse {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut diagnostics = Vec::new();
        for unit in &compilation.sources {
            let mut visitor = UseVisitor {
                analyzer: self,
                unit,
                diagnostics: &mut diagnostics,
            };
            visitor.visit_file(&unit.syntax);
        }
        Ok(diagnostics)
    }
}

struct UseVisitor<'a> {
    analyzer: &'a RestrictedUse,
    unit: &'a SourceUnit,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'ast> Visit<'ast> for UseVisitor<'_> {
    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        for flat in flatten_use_tree(&node.tree, "") {
            if self.analyzer.is_denied(&flat.path) {
                self.diagnostics.push(Diagnostic::new(
                    self.analyzer.id.clone(),
                    self.analyzer.severity,
                    Location::from_span(self.unit.relative_path.clone(), flat.span),
                    self.analyzer.message.replace("{path}", &flat.path),
                ));
            }
        }

        syn::visit::visit_item_use(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintgate_core::TypeOptions;

    fn check(options: &str, sources: &[(&str, &str)]) -> Vec<Diagnostic> {
        let options = TypeOptions::new(toml::from_str(options).unwrap());
        let analyzer = RestrictedUse::from_spec(&AnalyzerSpec {
            full_name: "layers::NoSqlInDomain",
            type_name: "NoSqlInDomain",
            options: &options,
        })
        .unwrap();

        let units = sources
            .iter()
            .map(|(path, code)| SourceUnit::parse(*path, *code).unwrap())
            .collect();
        analyzer
            .analyze(&Compilation::new("demo", ".").with_sources(units))
            .unwrap()
    }

    #[test]
    fn flags_grouped_imports_individually() {
        let diagnostics = check(
            r#"deny = ["sqlx::**"]"#,
            &[(
                "src/domain.rs",
                "use sqlx::{Pool, query};\nuse std::fmt;\n",
            )],
        );

        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "use of `sqlx::Pool` is restricted",
                "use of `sqlx::query` is restricted",
            ]
        );
        assert_eq!(diagnostics[0].location.to_string(), "src/domain.rs:1:12");
    }

    #[test]
    fn single_segment_wildcard() {
        let diagnostics = check(
            r#"
deny = ["std::process::*"]
message = "{path} is not allowed here"
severity = "error"
"#,
            &[(
                "src/lib.rs",
                "use std::process::exit;\nuse std::process::unix::CommandExt;\n",
            )],
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "std::process::exit is not allowed here");
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn nested_module_imports_are_checked() {
        let diagnostics = check(
            r#"deny = ["log::*"]"#,
            &[("src/lib.rs", "mod inner {\n    use log::info;\n}\n")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.to_string(), "src/lib.rs:2:14");
    }

    #[test]
    fn clean_sources_produce_nothing() {
        let diagnostics = check(
            r#"deny = ["sqlx::**"]"#,
            &[("src/lib.rs", "use std::collections::HashMap;\n")],
        );
        assert!(diagnostics.is_empty());
    }
}
