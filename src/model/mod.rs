//! Data model for parsed trees and their shared taxa.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Node] entries referenced by [NodeIndex]. Every node owns exactly one
//! [Edge]; parent links are plain back-reference indices, so the ownership
//! structure stays a strict tree. Arity is unrestricted: polytomies and the
//! blank nodes produced by consecutive separators are ordinary nodes.
//!
//! # Taxa
//! Leaf (and optionally internal) labels resolve against a shared
//! [TaxonNamespace], an ordered registry of [Taxon] entries referenced by
//! [TaxonId]. One namespace typically spans all trees of a parse session, so
//! trees over the same operational units share taxon identities.
//!
//! # Annotations
//! Structured comments (`[&key=value,...]`) can be extracted into
//! [Annotations] attached to trees and nodes; all other comments are kept
//! verbatim on the owning entity's comment list.

pub mod annotation;
pub mod taxon;
pub mod tree;

// Tree
pub use tree::Edge;
pub use tree::Node;
pub use tree::NodeIndex;
pub use tree::Rootedness;
pub use tree::Tree;
// Taxa
pub use taxon::Taxon;
pub use taxon::TaxonError;
pub use taxon::TaxonId;
pub use taxon::TaxonNamespace;
// Annotations
pub use annotation::AnnotationValue;
pub use annotation::Annotations;
