//! The compiled representation handed to analyzers.

use std::path::{Path, PathBuf};

/// One parsed source file of a project.
///
/// Carries metadata that analyzers can use to make context-aware decisions
/// (e.g., skip checks in test files).
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// File contents as a string.
    pub content: String,
    /// Whether this file is detected as a test file.
    pub is_test: bool,
    /// Parsed syntax tree.
    pub syntax: syn::File,
}

impl SourceUnit {
    /// Parses a source file.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `content` is not valid Rust.
    pub fn parse(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> syn::Result<Self> {
        let relative_path = relative_path.into();
        let content = content.into();
        let syntax = syn::parse_file(&content)?;
        Ok(Self {
            is_test: detect_test_file(&relative_path),
            relative_path,
            content,
            syntax,
        })
    }
}

/// A project in analyzable form.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Project name.
    pub project: String,
    /// Root directory of the project.
    pub root: PathBuf,
    /// Parsed sources, sorted by path.
    pub sources: Vec<SourceUnit>,
}

impl Compilation {
    /// Creates an empty compilation.
    #[must_use]
    pub fn new(project: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            root: root.into(),
            sources: Vec::new(),
        }
    }

    /// Sets the list of source units.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<SourceUnit>) -> Self {
        self.sources = sources;
        self
    }
}

/// Detects if a file is a test file based on path conventions.
fn detect_test_file(path: &Path) -> bool {
    for component in path.components() {
        if let std::path::Component::Normal(s) = component {
            let s = s.to_string_lossy();
            if s == "tests" || s == "test" || s == "benches" {
                return true;
            }
        }
    }

    if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
        if file_name.ends_with("_test.rs")
            || file_name.ends_with("_tests.rs")
            || file_name.starts_with("test_")
            || file_name == "tests.rs"
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_test_file() {
        assert!(detect_test_file(Path::new("src/tests/foo.rs")));
        assert!(detect_test_file(Path::new("tests/integration.rs")));
        assert!(detect_test_file(Path::new("src/foo_test.rs")));
        assert!(detect_test_file(Path::new("src/test_foo.rs")));
        assert!(!detect_test_file(Path::new("src/foo.rs")));
        assert!(!detect_test_file(Path::new("src/lib.rs")));
    }

    #[test]
    fn parse_rejects_invalid_source() {
        assert!(SourceUnit::parse("src/lib.rs", "fn broken( {").is_err());
    }


    #[test]
    fn parse_keeps_relative_path_and_test_flag() {
        let unit = SourceUnit::parse("tests/smoke.rs", "#[test] fn ok() {}").unwrap();
        assert_eq!(unit.relative_path, PathBuf::from("tests/smoke.rs"));
        assert!(unit.is_test);
        assert_eq!(unit.syntax.items.len(), 1);
    }
}
