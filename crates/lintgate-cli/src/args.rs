//! Slash-switch argument parsing.
//!
//! ```text
//! lintgate /analyzer rules/acme.toml /project ./app /project ./lib
//! ```
//!
//! Switches match case-insensitively and take the next token as their value,
//! whatever it looks like. Anything else is reported and skipped.

use std::fmt;
use std::path::PathBuf;

/// Usage text printed for malformed command lines.
pub const USAGE: &str = "Options: /project <project path>\n         /analyzer <plugin manifest>";

/// A token that is neither a switch nor a switch's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentWarning {
    /// The offending token.
    pub token: String,
}

impl fmt::Display for ArgumentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning: unknown argument '{}'", self.token)
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Project paths, in order.
    pub projects: Vec<PathBuf>,
    /// Plugin manifest paths, in order.
    pub analyzers: Vec<PathBuf>,
    /// Unrecognized tokens, in order.
    pub warnings: Vec<ArgumentWarning>,
    /// No tokens, or an odd number of them.
    pub malformed: bool,
}

#[derive(Clone, Copy)]
enum Switch {
    Project,
    Analyzer,
}

impl Switch {
    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("/project") {
            Some(Self::Project)
        } else if token.eq_ignore_ascii_case("/analyzer") {
            Some(Self::Analyzer)
        } else {
            None
        }
    }
}

/// Parses the raw positional tokens.
#[must_use]
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Invocation {
    let mut invocation = Invocation {
        malformed: tokens.is_empty() || tokens.len() % 2 != 0,
        ..Invocation::default()
    };

    let mut pending = None;
    for token in tokens.iter().map(AsRef::as_ref) {
        if let Some(switch) = pending.take() {
            let value = PathBuf::from(token);
            match switch {
                Switch::Project => invocation.projects.push(value),
                Switch::Analyzer => invocation.analyzers.push(value),
            }
            continue;
        }

        match Switch::parse(token) {
            Some(switch) => pending = Some(switch),
            None => invocation.warnings.push(ArgumentWarning {
                token: token.to_string(),
            }),
        }
    }

    invocation
}
