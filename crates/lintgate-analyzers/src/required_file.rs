//! `required-file`: a project-wide check that a file exists.

use lintgate_core::{
    AnalysisError, Analyzer, AnalyzerSpec, Compilation, Diagnostic, FactoryError, Location,
    Severity,
};
use std::path::PathBuf;

/// Kind name in plugin manifests.
pub const KIND: &str = "required-file";

/// One-line summary shown by `--list-kinds`.
pub const DESCRIPTION: &str = "Requires a file to exist in the project root";

/// Reports a project-wide diagnostic when `path` is absent from the
/// project root.
#[derive(Debug, Clone)]
pub struct RequiredFile {
    full_name: String,
    id: String,
    severity: Severity,
    path: PathBuf,
    message: String,
}

impl RequiredFile {
    /// Builds the analyzer from manifest options.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is missing or an option is mistyped.
    pub fn from_spec(spec: &AnalyzerSpec<'_>) -> Result<Self, FactoryError> {
        let path = spec.options.require_str("path")?;
        let message = match spec.options.get_str("message")? {
            Some(m) => m.to_string(),
            None => format!("required file `{path}` is missing"),
        };

        Ok(Self {
            full_name: spec.full_name.to_string(),
            id: spec.diagnostic_id()?,
            severity: spec.options.severity(Severity::Warning)?,
            path: PathBuf::from(path),
            message,
        })
    }
}

impl Analyzer for RequiredFile {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        let target = compilation.root.join(&self.path);
        tracing::trace!("Checking for {}", target.display());
        match target.try_exists() {
            Ok(true) => Ok(vec![]),
            Ok(false) => Ok(vec![Diagnostic::new(
                self.id.clone(),
                self.severity,
                Location::Project,
                self.message.clone(),
            )]),
            Err(e) => Err(AnalysisError::new(format!(
                "cannot check {}: {e}",
                target.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintgate_core::TypeOptions;
    use tempfile::TempDir;

    fn analyzer(options: &str) -> RequiredFile {
        let options = TypeOptions::new(toml::from_str(options).unwrap());
        RequiredFile::from_spec(&AnalyzerSpec {
            full_name: "docs::Readme",
            type_name: "Readme",
            options: &options,
        })
        .unwrap()
    }

    #[test]
    fn present_file_passes() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("README.md"), "# demo").unwrap();

        let diagnostics = analyzer(r#"path = "README.md""#)
            .analyze(&Compilation::new("demo", tmp.path()))
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_file_is_project_wide() {
        let tmp = TempDir::new().unwrap();

        let diagnostics = analyzer(
            r#"
path = "CHANGELOG.md"
severity = "error"
"#,
        )
        .analyze(&Compilation::new("demo", tmp.path()))
        .unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, Location::Project);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].to_string(),
            "<project>: required file `CHANGELOG.md` is missing"
        );
    }
}
