//! `method-call`: flags calls to named methods.
//!
//! # Options
//!
//! - `methods` (required): method names, e.g. `["unwrap", "expect"]`
//! - `message`: diagnostic text, `{method}` is replaced by the method name
//! - `allow_in_tests`: skip test files, `#[test]` functions and
//!   `#[cfg(test)]` modules (default: true)
//! - `severity`, `id`
//!
//! # Example
//!
//! ```toml
//! [[types]]
//! name = "NoUnwrap"
//! kind = "method-call"
//! [types.options]
//! methods = ["unwrap", "expect"]
//! message = ".{method}() is forbidden in production code"
//! ```

use crate::syntax::{has_cfg_test, has_test_attr};
use lintgate_core::{
    AnalysisError, Analyzer, AnalyzerSpec, Compilation, Diagnostic, FactoryError, Location,
    Severity, SourceUnit,
};
use syn::visit::Visit;
use syn::{ExprMethodCall, ItemFn, ItemMod};

/// Kind name in plugin manifests.
pub const KIND: &str = "method-call";

/// One-line summary shown by `--list-kinds`.
pub const DESCRIPTION: &str = "Flags calls to named methods";

const DEFAULT_MESSAGE: &str = ".{method}() call is forbidden";

/// Flags `.method()` calls by name.
#[derive(Debug, Clone)]
pub struct MethodCall {
    full_name: String,
    id: String,
    severity: Severity,
    methods: Vec<String>,
    message: String,
    allow_in_tests: bool,
}

impl MethodCall {
    /// Builds the analyzer from manifest options.
    ///
    /// # Errors
    ///
    /// Returns an error if `methods` is missing or an option is mistyped.
    pub fn from_spec(spec: &AnalyzerSpec<'_>) -> Result<Self, FactoryError> {
        Ok(Self {
            full_name: spec.full_name.to_string(),
            id: spec.diagnostic_id()?,
            severity: spec.options.severity(Severity::Warning)?,
            methods: spec.options.require_str_array("methods")?,
            message: spec
                .options
                .get_str("message")?
                .unwrap_or(DEFAULT_MESSAGE)
                .to_string(),
            allow_in_tests: spec.options.get_bool("allow_in_tests", true)?,
        })
    }

    fn check_source(&self, unit: &SourceUnit) -> Vec<Diagnostic> {
        if self.allow_in_tests && unit.is_test {
            tracing::trace!("{}: skipping test file {}", self.full_name, unit.relative_path.display());
            return Vec::new();
        }

        let mut visitor = MethodCallVisitor {
            analyzer: self,
            unit,
            diagnostics: Vec::new(),
            in_test_context: false,
        };
        visitor.visit_file(&unit.syntax);
        visitor.diagnostics
    }
}

impl Analyzer for MethodCall {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
        Ok(compilation
            .sources
            .iter()
            .flat_map(|unit| self.check_source(unit))
            .collect())
    }
}

struct MethodCallVisitor<'a> {
    analyzer: &'a MethodCall,
    unit: &'a SourceUnit,
    diagnostics: Vec<Diagnostic>,
    in_test_context: bool,
}

impl<'ast> Visit<'ast> for MethodCallVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        let was_in_test = self.in_test_context;
        if has_cfg_test(&node.attrs) {
            self.in_test_context = true;
        }

        syn::visit::visit_item_mod(self, node);
        self.in_test_context = was_in_test;
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let was_in_test = self.in_test_context;
        if has_test_attr(&node.attrs) || has_cfg_test(&node.attrs) {
            self.in_test_context = true;
        }

        syn::visit::visit_item_fn(self, node);
        self.in_test_context = was_in_test;
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        let skip = self.analyzer.allow_in_tests && self.in_test_context;
        let method = node.method.to_string();

        if !skip && self.analyzer.methods.iter().any(|m| *m == method) {
            self.diagnostics.push(Diagnostic::new(
                self.analyzer.id.clone(),
                self.analyzer.severity,
                Location::from_span(self.unit.relative_path.clone(), node.method.span()),
                self.analyzer.message.replace("{method}", &method),
            ));
        }

        syn::visit::visit_expr_method_call(self, node);
    }
}
