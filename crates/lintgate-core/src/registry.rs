//! The set of analyzers a run will execute.

use crate::analyzer::AnalyzerBox;
use crate::config::Config;
use crate::orchestrator::{log_transition, RunState};
use crate::plugin::{PluginLoadError, PluginLoader};
use std::path::Path;
use tracing::{debug, info};

/// Analyzers accumulated from every loaded plugin, in discovery order.
///
/// Nothing is de-duplicated: loading the same plugin twice registers its
/// analyzers twice. Call [`close`](Self::close) once loading is finished.
#[derive(Default)]
pub struct AnalyzerRegistry {
    analyzers: Vec<AnalyzerBox>,
    plugin_count: usize,
}

impl AnalyzerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every plugin in order and registers its analyzers.
    ///
    /// # Errors
    ///
    /// Returns the first plugin load failure; nothing after it is loaded.
    pub fn from_plugins<P: AsRef<Path>>(
        loader: &mut PluginLoader<'_>,
        plugins: &[P],
    ) -> Result<Self, PluginLoadError> {
        log_transition(RunState::Idle, RunState::Loading);
        let mut registry = Self::new();
        for path in plugins {
            let analyzers = loader.load_plugin(path.as_ref()).map_err(|e| {
                log_transition(RunState::Loading, RunState::Aborted);
                e
            })?;
            registry.register_plugin(analyzers);
        }
        Ok(registry)
    }

    /// Registers the analyzers discovered in one plugin.
    pub fn register_plugin(&mut self, analyzers: Vec<AnalyzerBox>) {
        self.plugin_count += 1;
        self.analyzers.extend(analyzers);
    }

    /// Number of registered analyzers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    /// Returns `true` if no analyzers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Number of plugins registered.
    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugin_count
    }

    /// Freezes the registry, dropping analyzers the configuration disables.
    #[must_use]
    pub fn close(self, config: &Config) -> ClosedRegistry {
        let analyzers: Vec<AnalyzerBox> = self
            .analyzers
            .into_iter()
            .filter(|a| {
                let enabled = config.is_analyzer_enabled(a.full_name());
                if !enabled {
                    debug!("Skipping disabled analyzer: {}", a.full_name());
                }
                enabled
            })
            .collect();

        log_transition(RunState::Loading, RunState::Registered);
        info!(
            "Registry closed with {} analyzer(s) from {} plugin(s)",
            analyzers.len(),
            self.plugin_count
        );

        ClosedRegistry {
            analyzers,
            plugin_count: self.plugin_count,
        }
    }
}

/// A registry that can no longer change.
pub struct ClosedRegistry {
    analyzers: Vec<AnalyzerBox>,
    plugin_count: usize,
}

impl ClosedRegistry {
    /// Number of analyzers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    /// Returns `true` if no analyzers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Number of plugins the analyzers came from.
    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugin_count
    }

    /// Iterates analyzers in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &AnalyzerBox> {
        self.analyzers.iter()
    }
}
