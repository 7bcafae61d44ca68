//! Taxa and the shared taxon namespace.
//!
//! This module provides:
//! - [`Taxon`] — a named operational unit referenced by tree nodes
//! - [`TaxonId`] — stable identity of a taxon within its namespace
//! - [`TaxonNamespace`] — the ordered registry binding labels to taxa for
//!   one or more trees
//!
//! A namespace is shared across all trees of one parse session. It grows
//! monotonically while open; once [closed](TaxonNamespace::close), labels
//! only resolve to existing taxa and unknown labels are rejected.

use std::collections::HashMap;
use std::fmt;

/// Identity of a taxon within its [TaxonNamespace] (arena index).
pub type TaxonId = usize;

// =#========================================================================#=
// TAXON
// =#========================================================================#=
/// A named operational unit (e.g. a species or sample).
///
/// Taxa are owned by their [TaxonNamespace] and referenced from tree nodes
/// by [TaxonId]. An entry, once created, stays valid for the lifetime of the
/// namespace, so nodes bound to it never dangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxon {
    label: String,
}

impl Taxon {
    /// Returns the label of this taxon.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Taxon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.label, f)
    }
}

// =#========================================================================#=
// TAXON NAMESPACE
// =#========================================================================$=
/// Ordered, append-only registry of [Taxon] entries with label lookup.
///
/// Labels are unique unless duplicates are explicitly permitted. Lookup
/// normalizes case unless case-sensitive labels are configured; underscore
/// folding happens upstream in the parser, which knows whether a label token
/// was quoted.
///
/// # Example
/// ```
/// use treewick::model::TaxonNamespace;
///
/// let mut taxa = TaxonNamespace::new();
/// let puffin = taxa.add_taxon("Fratercula arctica").unwrap();
/// assert_eq!(taxa[puffin].label(), "Fratercula arctica");
/// assert_eq!(taxa.resolve("FRATERCULA ARCTICA"), Some(puffin));
/// ```
#[derive(Debug, Default)]
pub struct TaxonNamespace {
    /// Taxa in creation order
    taxa: Vec<Taxon>,
    /// Normalized label -> id of the first taxon carrying it
    lookup: HashMap<String, TaxonId>,
    case_sensitive: bool,
    allow_duplicates: bool,
    closed: bool,
}

impl TaxonNamespace {
    /// Creates a new, open namespace with case-insensitive lookup and
    /// duplicate labels disallowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures label lookup to be case-sensitive.
    pub fn with_case_sensitive_labels(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Permits repeated labels to map to distinct taxa.
    pub fn with_duplicates_allowed(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Closes the namespace: no further taxa can be created, and labels
    /// only resolve to existing entries.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns whether the namespace is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns whether label lookup is case-sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns whether repeated labels are permitted.
    pub fn duplicates_allowed(&self) -> bool {
        self.allow_duplicates
    }

    pub(crate) fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub(crate) fn set_duplicates_allowed(&mut self, allow_duplicates: bool) {
        self.allow_duplicates = allow_duplicates;
    }

    /// Resolves a label to the id of the first taxon carrying it, applying
    /// the configured case policy.
    ///
    /// # Returns
    /// `Some(TaxonId)` if the label names a taxon, `None` otherwise
    pub fn resolve(&self, label: &str) -> Option<TaxonId> {
        self.lookup.get(&self.normalized(label)).copied()
    }

    /// Adds a taxon with the given label.
    ///
    /// # Returns
    /// * `Ok(TaxonId)` - Id of the new taxon
    /// * `Err(TaxonError)` - If the namespace is closed, or the label already
    ///   exists while duplicates are disallowed
    pub fn add_taxon(&mut self, label: &str) -> Result<TaxonId, TaxonError> {
        if self.closed {
            return Err(TaxonError::NamespaceClosed(label.to_string()));
        }
        if !self.allow_duplicates && self.resolve(label).is_some() {
            return Err(TaxonError::DuplicateLabel(label.to_string()));
        }
        Ok(self.insert_unchecked(label))
    }

    /// Adds a taxon without any duplicate or closed check.
    ///
    /// Callers must have checked that the namespace is open. Lookup keeps
    /// pointing at the first taxon with this label.
    pub(crate) fn insert_unchecked(&mut self, label: &str) -> TaxonId {
        debug_assert!(!self.closed);
        let key = self.normalized(label);
        let id = self.taxa.len();
        self.taxa.push(Taxon {
            label: label.to_string(),
        });
        self.lookup.entry(key).or_insert(id);
        id
    }

    /// Returns a reference to the taxon with the given id.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    pub fn taxon(&self, id: TaxonId) -> &Taxon {
        &self.taxa[id]
    }

    /// Checks whether a label names a taxon in this namespace.
    pub fn contains_label(&self, label: &str) -> bool {
        self.resolve(label).is_some()
    }

    /// Returns the number of taxa in this namespace.
    pub fn num_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Returns whether the namespace holds no taxa.
    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Iterates over the taxa in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Taxon> {
        self.taxa.iter()
    }

    /// Label normalized under the configured case policy.
    fn normalized(&self, label: &str) -> String {
        if self.case_sensitive {
            label.to_string()
        } else {
            label.to_ascii_lowercase()
        }
    }
}

impl std::ops::Index<TaxonId> for TaxonNamespace {
    type Output = Taxon;

    fn index(&self, id: TaxonId) -> &Self::Output {
        &self.taxa[id]
    }
}

impl fmt::Display for TaxonNamespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TaxonNamespace ({} taxa):", self.taxa.len())?;
        for (id, taxon) in self.taxa.iter().enumerate() {
            writeln!(f, "  [{}] {}", id, taxon.label)?;
        }
        Ok(())
    }
}

// =#========================================================================#=
// TAXON ERROR
// =#========================================================================$=
/// Error returned when a taxon cannot be added to a [TaxonNamespace].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaxonError {
    /// The label already names a taxon and duplicates are disallowed.
    #[error("taxon label '{0}' already exists in the namespace")]
    DuplicateLabel(String),

    /// The namespace was closed before this label was added.
    #[error("cannot add taxon '{0}' to a closed namespace")]
    NamespaceClosed(String),
}
