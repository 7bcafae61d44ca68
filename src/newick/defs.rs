//! Constants for Newick tree-statement parsing.

/// Comment bodies declaring a tree explicitly rooted.
pub(crate) const ROOTED_DIRECTIVES: &[&str] = &["&R", "&r"];

/// Comment bodies declaring a tree explicitly unrooted.
pub(crate) const UNROOTED_DIRECTIVES: &[&str] = &["&U", "&u"];

/// Sigils opening a tree-weight directive comment, e.g. `[&W 1/2]`.
pub(crate) const WEIGHT_SIGILS: &[&str] = &["&W", "&w"];

/// Prefix marking an NHX-style metadata comment with ':'-separated fields.
pub(crate) const NHX_PREFIX: &str = "&&NHX:";

/// Weight assigned to trees without a weight directive
/// when weight tracking is enabled.
pub(crate) const DEFAULT_TREE_WEIGHT: f64 = 1.0;
