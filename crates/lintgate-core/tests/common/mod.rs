//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lintgate_core::{
    AnalysisError, Analyzer, AnalyzerCatalog, Compilation, Diagnostic, Location, ProjectLoadError,
    ProjectSource, ProjectUnit, Severity,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Emits one project-wide diagnostic per run at a fixed severity.
pub struct Always {
    pub full_name: String,
    pub id: String,
    pub severity: Severity,
}

impl Analyzer for Always {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        Ok(vec![Diagnostic::new(
            self.id.clone(),
            self.severity,
            Location::Project,
            format!("{} flagged {}", self.id, compilation.project),
        )])
    }
}

/// Fails every run.
pub struct Failing(pub String);

impl Analyzer for Failing {
    fn full_name(&self) -> &str {
        &self.0
    }

    fn analyze(&self, _: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        Err(AnalysisError::new("analyzer crashed"))
    }
}

/// Catalog with an `always` kind (options `severity`, `id`) and a `failing` kind.
pub fn test_catalog() -> AnalyzerCatalog {
    AnalyzerCatalog::new()
        .with("always", "Emits one diagnostic per project", |spec| {
            Ok(Box::new(Always {
                full_name: spec.full_name.to_string(),
                id: spec.diagnostic_id()?,
                severity: spec.options.severity(Severity::Warning)?,
            }))
        })
        .with("failing", "Always fails", |spec| {
            Ok(Box::new(Failing(spec.full_name.to_string())))
        })
}

/// A directory of plugin manifests.
pub struct PluginDir {
    dir: TempDir,
}

impl PluginDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn write(&self, file: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Projects that exist only by name; compilation has no sources.
pub struct VirtualProjects;

impl ProjectSource for VirtualProjects {
    fn open(&self, path: &Path) -> Result<ProjectUnit, ProjectLoadError> {
        Ok(ProjectUnit {
            name: path.display().to_string(),
            path: path.to_path_buf(),
            root: path.to_path_buf(),
        })
    }

    fn compile(&self, project: &ProjectUnit) -> Result<Compilation, ProjectLoadError> {
        Ok(Compilation::new(project.name.clone(), project.root.clone()))
    }
}

pub fn names(analyzers: &[lintgate_core::AnalyzerBox]) -> Vec<String> {
    analyzers.iter().map(|a| a.full_name().to_string()).collect()
}
