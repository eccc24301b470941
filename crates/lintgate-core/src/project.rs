//! Projects and the collaborator that compiles them.

use crate::compilation::{Compilation, SourceUnit};
use crate::config::ProjectConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors raised while opening or compiling a project.
#[derive(Debug, Error)]
pub enum ProjectLoadError {
    /// The project path does not exist.
    #[error("project not found: {path}")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// IO error reading project files.
    #[error("IO error in {path}: {source}")]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The project manifest is not valid TOML.
    #[error("invalid project manifest {path}: {message}")]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// A source file does not parse.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// An exclude pattern is not a valid glob.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A named project, as opened by a [`ProjectSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUnit {
    /// Project name.
    pub name: String,
    /// Path as given on the command line.
    pub path: PathBuf,
    /// Directory the project's sources live under.
    pub root: PathBuf,
}

/// Supplies projects and their compiled representation.
pub trait ProjectSource {
    /// Opens a project and determines its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be opened.
    fn open(&self, path: &Path) -> Result<ProjectUnit, ProjectLoadError>;

    /// Produces the compilation analyzers run against.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the project cannot be compiled.
    fn compile(&self, project: &ProjectUnit) -> Result<Compilation, ProjectLoadError>;
}

/// Project source backed by Rust crates on disk.
///
/// A project path is either a directory or a `Cargo.toml`. The name comes
/// from `[package].name` when present, otherwise from the directory name.
/// Exclude globs match paths relative to the project root, so where the
/// project itself lives never hides its sources.
#[derive(Debug, Clone)]
pub struct FsProjectSource {
    exclude: Vec<glob::Pattern>,
}

impl FsProjectSource {
    /// Creates a source that skips files matching any exclude glob.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn new<I, S>(exclude: I) -> Result<Self, ProjectLoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclude = exclude
            .into_iter()
            .map(|pattern| glob::Pattern::new(pattern.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { exclude })
    }

    /// Creates a source from the `[project]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern is not a valid glob.
    pub fn from_config(config: &ProjectConfig) -> Result<Self, ProjectLoadError> {
        Self::new(&config.exclude)
    }

    /// Checks a root-relative path against the exclude globs.
    ///
    /// Directories are also tested with a trailing component so that
    /// `**/target/**` prunes `target` itself.
    fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        if relative.as_os_str().is_empty() {
            return false;
        }
        let inside = is_dir.then(|| relative.join("_"));
        self.exclude.iter().any(|pattern| {
            pattern.matches_path(relative)
                || inside.as_deref().is_some_and(|p| pattern.matches_path(p))
        })
    }

    /// Discovers all Rust source files under `root`, sorted.
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>, ProjectLoadError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let excluded = self.is_excluded(relative, entry.file_type().is_dir());
            if excluded {
                debug!("Excluding: {}", relative.display());
            }
            !excluded
        });

        for entry in walker {
            let entry = entry.map_err(|e| ProjectLoadError::Io {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                source: e.into(),
            })?;
            let path = entry.path();

            let is_rust = path.extension().is_some_and(|ext| ext == "rs");
            if entry.file_type().is_file() && is_rust {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for FsProjectSource {
    fn default() -> Self {
        let exclude = ProjectConfig::default()
            .exclude
            .iter()
            .filter_map(|pattern| glob::Pattern::new(pattern).ok())
            .collect();
        Self { exclude }
    }
}

impl ProjectSource for FsProjectSource {
    fn open(&self, path: &Path) -> Result<ProjectUnit, ProjectLoadError> {
        if !path.exists() {
            return Err(ProjectLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let (root, manifest) = if path.is_file() {
            let root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (root, Some(path.to_path_buf()))
        } else {
            let candidate = path.join("Cargo.toml");
            let manifest = candidate.is_file().then_some(candidate);
            (path.to_path_buf(), manifest)
        };

        let package_name = match &manifest {
            Some(manifest) => read_package_name(manifest)?,
            None => None,
        };

        let name = package_name.unwrap_or_else(|| directory_name(&root));
        debug!("Opened project {name} at {}", root.display());

        Ok(ProjectUnit {
            name,
            path: path.to_path_buf(),
            root,
        })
    }

    fn compile(&self, project: &ProjectUnit) -> Result<Compilation, ProjectLoadError> {
        let files = self.discover_files(&project.root)?;
        debug!("Compiling {} with {} source file(s)", project.name, files.len());

        let mut sources = Vec::with_capacity(files.len());
        for path in files {
            let content = std::fs::read_to_string(&path).map_err(|source| ProjectLoadError::Io {
                path: path.clone(),
                source,
            })?;
            let relative = path
                .strip_prefix(&project.root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            let unit = SourceUnit::parse(&relative, content).map_err(|e| ProjectLoadError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            sources.push(unit);
        }

        Ok(Compilation::new(project.name.clone(), project.root.clone()).with_sources(sources))
    }
}

fn read_package_name(manifest: &Path) -> Result<Option<String>, ProjectLoadError> {
    let content = std::fs::read_to_string(manifest).map_err(|source| ProjectLoadError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| ProjectLoadError::Manifest {
        path: manifest.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(table
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(toml::Value::as_str)
        .map(String::from))
}

fn directory_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned())
}
