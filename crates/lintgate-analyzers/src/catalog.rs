//! The catalog of built-in analyzer kinds.

use crate::{method_call, required_file, restricted_use, text_pattern};
use crate::{MethodCall, RequiredFile, RestrictedUse, TextPattern};
use lintgate_core::{AnalyzerBox, AnalyzerCatalog};

/// Returns a catalog with every built-in kind registered.
#[must_use]
pub fn builtin_catalog() -> AnalyzerCatalog {
    AnalyzerCatalog::new()
        .with(
            method_call::KIND,
            method_call::DESCRIPTION,
            |spec| Ok(Box::new(MethodCall::from_spec(spec)?) as AnalyzerBox),
        )
        .with(
            restricted_use::KIND,
            restricted_use::DESCRIPTION,
            |spec| Ok(Box::new(RestrictedUse::from_spec(spec)?) as AnalyzerBox),
        )
        .with(
            text_pattern::KIND,
            text_pattern::DESCRIPTION,
            |spec| Ok(Box::new(TextPattern::from_spec(spec)?) as AnalyzerBox),
        )
        .with(
            required_file::KIND,
            required_file::DESCRIPTION,
            |spec| Ok(Box::new(RequiredFile::from_spec(spec)?) as AnalyzerBox),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintgate_core::{AnalyzerSpec, TypeOptions};

    #[test]
    fn registers_all_builtin_kinds() {
        let catalog = builtin_catalog();
        let kinds: Vec<&str> = catalog.kinds().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec!["method-call", "required-file", "restricted-use", "text-pattern"]
        );
    }

    #[test]
    fn instances_describe_themselves_like_their_kind() {
        let catalog = builtin_catalog();
        let options = TypeOptions::new(
            toml::from_str(
                r#"
methods = ["unwrap"]
deny = ["std::process"]
pattern = "TODO"
path = "README.md"
"#,
            )
            .unwrap(),
        );
        let spec = AnalyzerSpec {
            full_name: "m::T",
            type_name: "T",
            options: &options,
        };

        for (kind, description) in catalog.kinds() {
            let analyzer = catalog.instantiate(kind, &spec).unwrap();
            assert_eq!(analyzer.description(), description, "{kind}");
        }
    }
}
