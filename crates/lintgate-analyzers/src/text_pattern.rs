//! `text-pattern`: flags source lines containing a substring.

use lintgate_core::{
    AnalysisError, Analyzer, AnalyzerSpec, Compilation, Diagnostic, FactoryError, Location,
    Severity,
};

/// Kind name in plugin manifests.
pub const KIND: &str = "text-pattern";

/// One-line summary shown by `--list-kinds`.
pub const DESCRIPTION: &str = "Flags source lines containing a substring";

/// Flags every line containing `pattern`, at the first occurrence.
#[derive(Debug, Clone)]
pub struct TextPattern {
    full_name: String,
    id: String,
    severity: Severity,
    pattern: String,
    message: String,
}

impl TextPattern {
    /// Builds the analyzer from manifest options.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is missing or empty.
    pub fn from_spec(spec: &AnalyzerSpec<'_>) -> Result<Self, FactoryError> {
        let pattern = spec.options.require_str("pattern")?;
        if pattern.is_empty() {
            return Err(FactoryError::InvalidOption {
                key: "pattern".to_string(),
                expected: "a non-empty string",
            });
        }

        let message = match spec.options.get_str("message")? {
            Some(m) => m.to_string(),
            None => format!("line contains `{pattern}`"),
        };

        Ok(Self {
            full_name: spec.full_name.to_string(),
            id: spec.diagnostic_id()?,
            severity: spec.options.severity(Severity::Warning)?,
            pattern: pattern.to_string(),
            message,
        })
    }
}

impl Analyzer for TextPattern {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut diagnostics = Vec::new();

        for unit in &compilation.sources {
            for (index, line) in unit.content.lines().enumerate() {
                let Some(offset) = line.find(&self.pattern) else {
                    continue;
                };
                let column = line[..offset].chars().count() + 1;
                diagnostics.push(Diagnostic::new(
                    self.id.clone(),
                    self.severity,
                    Location::new(unit.relative_path.clone(), index + 1, column),
                    self.message.clone(),
                ));
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintgate_core::{SourceUnit, TypeOptions};

    fn analyzer(options: &str) -> Result<TextPattern, FactoryError> {
        let options = TypeOptions::new(toml::from_str(options).unwrap());
        TextPattern::from_spec(&AnalyzerSpec {
            full_name: "hygiene::NoTodo",
            type_name: "NoTodo",
            options: &options,
        })
    }

    #[test]
    fn reports_each_matching_line_once() {
        let a = analyzer(r#"pattern = "TODO""#).unwrap();
        let source = SourceUnit::parse(
            "src/lib.rs",
            "// TODO: one\nfn f() {}\n    // TODO TODO: two\n",
        )
        .unwrap();
        let diagnostics = a
            .analyze(&Compilation::new("demo", ".").with_sources(vec![source]))
            .unwrap();

        let locations: Vec<String> = diagnostics.iter().map(|d| d.location.to_string()).collect();
        assert_eq!(locations, vec!["src/lib.rs:1:4", "src/lib.rs:3:8"]);
        assert_eq!(diagnostics[0].message, "line contains `TODO`");
        assert_eq!(diagnostics[0].id, "NoTodo");
    }

    #[test]
    fn columns_count_characters() {
        let a = analyzer(
            r#"
pattern = "FIXME"
message = "resolve before release"
severity = "info"
"#,
        )
        .unwrap();
        let source = SourceUnit::parse("src/lib.rs", "// é FIXME\n").unwrap();
        let diagnostics = a
            .analyze(&Compilation::new("demo", ".").with_sources(vec![source]))
            .unwrap();

        assert_eq!(diagnostics[0].location.to_string(), "src/lib.rs:1:6");
        assert_eq!(diagnostics[0].message, "resolve before release");
        assert_eq!(diagnostics[0].severity, Severity::Info);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(matches!(
            analyzer(r#"pattern = """#),
            Err(FactoryError::InvalidOption { .. })
        ));
    }
}
