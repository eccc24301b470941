//! Process exit codes for CI integration.

/// Every project passed, including runs with no projects or no analyzers.
pub const SUCCESS: u8 = 0;
/// At least one project has interesting diagnostics.
pub const FINDINGS: u8 = 1;
/// The tool failed: plugin, project, analysis, configuration or output error.
pub const TOOL_FAILURE: u8 = 2;
/// Malformed command line under the `abort` policy.
pub const USAGE: u8 = 3;
