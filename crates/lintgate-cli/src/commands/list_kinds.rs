//! `--list-kinds` implementation.

use lintgate_analyzers::builtin_catalog;

/// Prints the analyzer kinds plugin manifests can use.
pub fn run() {
    println!("Available analyzer kinds:\n");
    println!("{:<18} Description", "Kind");
    println!("{}", "-".repeat(60));

    for (kind, description) in builtin_catalog().kinds() {
        println!("{kind:<18} {description}");
    }

    println!("\nDeclare a type with one of these kinds in a plugin manifest, e.g.:");
    println!("  [[types]]");
    println!("  name = \"NoUnwrap\"");
    println!("  kind = \"method-call\"");
    println!("  [types.options]");
    println!("  methods = [\"unwrap\", \"expect\"]");
}
