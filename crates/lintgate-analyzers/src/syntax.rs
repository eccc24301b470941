//! Syntax helpers shared by the AST-based analyzers.

use syn::spanned::Spanned;
use syn::{Attribute, Meta};

/// Checks if attributes contain a `#[test]` attribute.
#[must_use]
pub fn has_test_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("test"))
}

/// Checks if attributes contain a `#[cfg(...)]` mentioning `test`.
#[must_use]
pub fn has_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("cfg") {
            return false;
        }
        match &attr.meta {
            Meta::List(list) => list.tokens.to_string().contains("test"),
            _ => false,
        }
    })
}

/// A flattened `use` path with the span of its leaf.
pub struct FlatUse {
    /// Full path like `std::collections::HashMap`, or `std::io::*` for globs.
    pub path: String,
    /// Span of the leaf for locations.
    pub span: proc_macro2::Span,
}

/// Expands a [`syn::UseTree`] into flat `::` separated paths.
///
/// `use std::collections::{HashMap, BTreeMap};` expands to
/// `std::collections::HashMap` and `std::collections::BTreeMap`.
pub fn flatten_use_tree(tree: &syn::UseTree, prefix: &str) -> Vec<FlatUse> {
    let join = |leaf: &dyn std::fmt::Display| {
        if prefix.is_empty() {
            leaf.to_string()
        } else {
            format!("{prefix}::{leaf}")
        }
    };

    match tree {
        syn::UseTree::Path(p) => flatten_use_tree(&p.tree, &join(&p.ident)),
        syn::UseTree::Name(n) => vec![FlatUse {
            path: join(&n.ident),
            span: n.ident.span(),
        }],
        syn::UseTree::Rename(r) => vec![FlatUse {
            path: join(&r.ident),
            span: r.ident.span(),
        }],
        syn::UseTree::Glob(g) => vec![FlatUse {
            path: join(&"*"),
            span: g.span(),
        }],
        syn::UseTree::Group(g) => g
            .items
            .iter()
            .flat_map(|item| flatten_use_tree(item, prefix))
            .collect(),
    }
}

/// Checks if a `::` path matches a pattern.
///
/// `*` matches exactly one segment and `**` matches any number of segments.
#[must_use]
pub fn path_matches(path: &str, pattern: &str) -> bool {
    let path: Vec<&str> = path.split("::").collect();
    let pattern: Vec<&str> = pattern.split("::").collect();
    match_segments(&path, &pattern)
}

fn match_segments(path: &[&str], pattern: &[&str]) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match *first {
        "**" => (0..=path.len()).any(|i| match_segments(&path[i..], rest)),
        "*" => !path.is_empty() && match_segments(&path[1..], rest),
        literal => path.first() == Some(&literal) && match_segments(&path[1..], rest),
    }
}
