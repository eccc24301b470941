//! Configuration types for lintgate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File names looked for in the working directory, first match wins.
pub const WORK_DIR_CONFIG_FILES: [&str; 2] = ["lintgate.toml", ".lintgate.toml"];

/// File name looked for in the user configuration directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Top-level configuration for lintgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run-level behaviour.
    #[serde(default)]
    pub run: RunConfig,

    /// Project compilation settings.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Per-analyzer configurations, keyed by full name (`module::Type`).
    #[serde(default)]
    pub analyzers: HashMap<String, AnalyzerConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if an analyzer is enabled.
    #[must_use]
    pub fn is_analyzer_enabled(&self, full_name: &str) -> bool {
        self.analyzers
            .get(full_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for an analyzer.
    #[must_use]
    pub fn analyzer_severity(&self, full_name: &str) -> Option<crate::Severity> {
        self.analyzers.get(full_name).and_then(|c| c.severity)
    }
}

/// Where a run's configuration comes from.
///
/// Lookup order: the `--config` path (taken as given, even if missing), then
/// [`WORK_DIR_CONFIG_FILES`] in the working directory, then
/// [`USER_CONFIG_FILE`] in the user directory, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Named on the command line.
    Flag(PathBuf),
    /// Found in the working directory.
    WorkDir(PathBuf),
    /// Found in the user configuration directory.
    UserDir(PathBuf),
    /// Nothing found.
    BuiltIn,
}

impl ConfigOrigin {
    /// Picks the configuration file for a run.
    #[must_use]
    pub fn locate(work_dir: &Path, flag: Option<&Path>, user_dir: Option<&Path>) -> Self {
        if let Some(path) = flag {
            return Self::Flag(path.to_path_buf());
        }

        let in_work_dir = WORK_DIR_CONFIG_FILES
            .iter()
            .map(|name| work_dir.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(path) = in_work_dir {
            return Self::WorkDir(path);
        }

        user_dir
            .map(|dir| dir.join(USER_CONFIG_FILE))
            .filter(|candidate| candidate.is_file())
            .map_or(Self::BuiltIn, Self::UserDir)
    }

    /// The file this origin points at, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(path) | Self::WorkDir(path) | Self::UserDir(path) => Some(path),
            Self::BuiltIn => None,
        }
    }

    /// Reads the configuration, or returns defaults for [`ConfigOrigin::BuiltIn`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config, ConfigError> {
        self.path().map_or_else(|| Ok(Config::default()), Config::from_file)
    }
}

/// What to do when the command line is malformed (no tokens, or an odd count).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedArgsPolicy {
    /// Print usage, then run with whatever was parsed.
    #[default]
    Continue,
    /// Print usage and stop with a usage exit status.
    Abort,
}

/// Run-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Policy for malformed command lines.
    #[serde(default)]
    pub on_malformed_args: MalformedArgsPolicy,
}

/// Project compilation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Glob patterns excluded from compilation.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            exclude: default_excludes(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    vec!["**/target/**".to_string(), "**/vendor/**".to_string()]
}

/// Per-analyzer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Whether this analyzer is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for every diagnostic this analyzer produces.
    #[serde(default)]
    pub severity: Option<crate::Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.run.on_malformed_args, MalformedArgsPolicy::Continue);
        assert_eq!(config.project.exclude.len(), 2);
        assert!(config.analyzers.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[run]
on_malformed_args = "abort"

[project]
exclude = ["**/generated/**"]

[analyzers."acme::NoTodo"]
enabled = false

[analyzers."acme::NoUnwrap"]
severity = "hidden"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.run.on_malformed_args, MalformedArgsPolicy::Abort);
        assert_eq!(config.project.exclude, vec!["**/generated/**"]);
        assert!(!config.is_analyzer_enabled("acme::NoTodo"));
        assert!(config.is_analyzer_enabled("acme::NoUnwrap"));
        assert!(config.is_analyzer_enabled("other::Anything"));
        assert_eq!(
            config.analyzer_severity("acme::NoUnwrap"),
            Some(Severity::Hidden)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_sections() {
        assert!(Config::parse("[rules.foo]\nenabled = true\n").is_err());
    }

    mod origin {
        use super::super::*;
        use std::fs;
        use tempfile::TempDir;

        fn touch(dir: &Path, name: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, "").unwrap();
            path
        }

        #[test]
        fn flag_wins_and_need_not_exist() {
            let work = TempDir::new().unwrap();
            touch(work.path(), "lintgate.toml");

            let origin = ConfigOrigin::locate(work.path(), Some(Path::new("ci.toml")), None);
            assert_eq!(origin, ConfigOrigin::Flag(PathBuf::from("ci.toml")));
            assert!(origin.load().is_err());
        }

        #[test]
        fn plain_name_beats_dotted_name() {
            let work = TempDir::new().unwrap();
            let dotted = touch(work.path(), ".lintgate.toml");
            assert_eq!(
                ConfigOrigin::locate(work.path(), None, None),
                ConfigOrigin::WorkDir(dotted)
            );

            let plain = touch(work.path(), "lintgate.toml");
            assert_eq!(
                ConfigOrigin::locate(work.path(), None, None),
                ConfigOrigin::WorkDir(plain)
            );
        }

        #[test]
        fn user_dir_only_when_work_dir_has_none() {
            let work = TempDir::new().unwrap();
            let user = TempDir::new().unwrap();
            let user_file = touch(user.path(), USER_CONFIG_FILE);

            assert_eq!(
                ConfigOrigin::locate(work.path(), None, Some(user.path())),
                ConfigOrigin::UserDir(user_file)
            );

            let local = touch(work.path(), ".lintgate.toml");
            assert_eq!(
                ConfigOrigin::locate(work.path(), None, Some(user.path())),
                ConfigOrigin::WorkDir(local)
            );
        }

        #[test]
        fn nothing_found_loads_defaults() {
            let work = TempDir::new().unwrap();
            let empty_user = TempDir::new().unwrap();

            let origin = ConfigOrigin::locate(work.path(), None, Some(empty_user.path()));
            assert_eq!(origin, ConfigOrigin::BuiltIn);
            assert!(origin.path().is_none());

            let config = origin.load().unwrap();
            assert_eq!(config.run.on_malformed_args, MalformedArgsPolicy::Continue);
        }

        #[test]
        fn located_file_is_parsed() {
            let work = TempDir::new().unwrap();
            fs::write(
                work.path().join("lintgate.toml"),
                "[run]\non_malformed_args = \"abort\"\n",
            )
            .unwrap();

            let config = ConfigOrigin::locate(work.path(), None, None).load().unwrap();
            assert_eq!(config.run.on_malformed_args, MalformedArgsPolicy::Abort);
        }
    }
}
