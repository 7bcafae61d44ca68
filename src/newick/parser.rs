//! Structs and logic to parse Newick tree statements.
//!
//! This module provides the [NewickTreeParser] struct, which offers methods
//! to parse one, several, or all tree statements from a token stream, as
//! well as lazy parsing via a [TreeIterator].

use crate::model::taxon::{TaxonId, TaxonNamespace};
use crate::model::tree::{Node, NodeIndex, Rootedness, Tree};
use crate::newick::comment::{CommentField, classify};
use crate::newick::defs::DEFAULT_TREE_WEIGHT;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParseError;
use crate::parser::tokenizer::Tokenizer;
use std::collections::HashSet;

// =#========================================================================#=
// ROOTING POLICY
// =#========================================================================#=
/// How trees without an explicit rooting directive are interpreted,
/// and whether directives are honored at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootingPolicy {
    /// All trees are unrooted, regardless of any directive
    ForceUnrooted,
    /// All trees are rooted, regardless of any directive
    ForceRooted,
    /// Trees are unrooted unless an `[&R]` directive says otherwise
    #[default]
    DefaultUnrooted,
    /// Trees are rooted unless an `[&U]` directive says otherwise
    DefaultRooted,
    /// Without a directive, rootedness stays
    /// [Unknown](crate::model::Rootedness::Unknown)
    Unknown,
}

// =#========================================================================#=
// EDGE LENGTH TYPE
// =#========================================================================#=
/// Numeric type edge-length tokens are cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeLengthType {
    /// Parse edge lengths as `f64` (scientific notation supported)
    #[default]
    Float,
    /// Parse edge lengths as `i64`; non-integer tokens are rejected
    Integer,
}

// =#========================================================================#=
// NEWICK TREE PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick tree statements.
///
/// One parser instance owns one [TaxonNamespace] for its whole parse
/// session, so all trees parsed through it share taxon identities. Labels
/// are classified per node kind: by default, leaf labels resolve to taxa
/// and internal labels are stored as plain strings (internal labels are
/// frequently support values rather than unit names).
///
/// # Construction
/// * [`new()`](Self::new) — all defaults (see Configuration)
///
/// # Configuration
/// * [`with_rooting(policy)`](Self::with_rooting) — default
///   [RootingPolicy::DefaultUnrooted]
/// * [`with_edge_length_type(t)`](Self::with_edge_length_type) — default
///   [EdgeLengthType::Float]
/// * [`with_suppressed_edge_lengths()`](Self::with_suppressed_edge_lengths)
///   — consume `:length` tokens without storing them
/// * [`with_comment_metadata()`](Self::with_comment_metadata) — parse
///   `[&key=value]` comments into annotations
/// * [`with_tree_weights()`](Self::with_tree_weights) — process `[&W ...]`
///   directives; absent directives default the weight to 1.0
/// * [`with_case_sensitive_labels()`](Self::with_case_sensitive_labels)
/// * [`with_preserved_underscores()`](Self::with_preserved_underscores) —
///   keep unquoted underscores instead of folding them to spaces
/// * [`with_resolved_internal_taxa()`](Self::with_resolved_internal_taxa) —
///   resolve internal labels to taxa instead of storing plain strings
/// * [`with_suppressed_external_taxa()`](Self::with_suppressed_external_taxa)
///   — store leaf labels as plain strings instead of resolving them
/// * [`with_duplicate_labels()`](Self::with_duplicate_labels) — repeated
///   labels create distinct taxa instead of failing
/// * [`with_namespace(taxa)`](Self::with_namespace) — adopt an existing
///   (possibly closed) namespace
/// * [`with_node_finished_hook(f)`](Self::with_node_finished_hook) — called
///   once per node after all its fields are set
///
/// # Parsing
/// * [`parse_next`](Self::parse_next) — parse a single statement
/// * [`parse_all`](Self::parse_all) — parse all statements eagerly
/// * [`into_iter`](Self::into_iter) — parse statements lazily
///
/// # Example
/// ```
/// use treewick::newick::NewickTreeParser;
/// use treewick::parser::Tokenizer;
///
/// let input = "((A_meleagrides:1.0,A_vulturinum:1.0):0.5,N_meleagris:1.0);";
/// let mut tokenizer = Tokenizer::for_str(input);
/// let mut parser = NewickTreeParser::new();
///
/// let tree = parser.parse_next(&mut tokenizer).unwrap().unwrap();
/// assert_eq!(tree.num_leaves(), 3);
///
/// let taxa = parser.into_namespace();
/// assert!(taxa.contains_label("A meleagrides"));
/// ```
pub struct NewickTreeParser {
    rooting: RootingPolicy,
    edge_length_type: EdgeLengthType,
    suppress_edge_lengths: bool,
    extract_comment_metadata: bool,
    track_tree_weights: bool,
    preserve_underscores: bool,
    suppress_internal_taxa: bool,
    suppress_external_taxa: bool,
    namespace: TaxonNamespace,
    on_node_finished: Option<Box<dyn FnMut(&mut Node)>>,
    /// Whether the statement currently being parsed saw its ';'
    statement_complete: bool,
    /// Taxa bound to nodes of the statement currently being parsed
    statement_taxa: HashSet<TaxonId>,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl NewickTreeParser {
    /// Creates a new [NewickTreeParser] with default settings and a fresh,
    /// open taxon namespace.
    pub fn new() -> Self {
        Self {
            rooting: RootingPolicy::default(),
            edge_length_type: EdgeLengthType::default(),
            suppress_edge_lengths: false,
            extract_comment_metadata: false,
            track_tree_weights: false,
            preserve_underscores: false,
            suppress_internal_taxa: true,
            suppress_external_taxa: false,
            namespace: TaxonNamespace::new(),
            on_node_finished: None,
            statement_complete: false,
            statement_taxa: HashSet::new(),
        }
    }

    /// Sets the rooting policy applied to parsed trees.
    pub fn with_rooting(mut self, rooting: RootingPolicy) -> Self {
        self.rooting = rooting;
        self
    }

    /// Sets the numeric type edge lengths are cast to.
    pub fn with_edge_length_type(mut self, edge_length_type: EdgeLengthType) -> Self {
        self.edge_length_type = edge_length_type;
        self
    }

    /// Configures the parser to consume `:length` tokens without storing
    /// them.
    pub fn with_suppressed_edge_lengths(mut self) -> Self {
        self.suppress_edge_lengths = true;
        self
    }

    /// Configures the parser to extract `[&key=value,...]` comments into
    /// annotations instead of keeping them as opaque comments.
    pub fn with_comment_metadata(mut self) -> Self {
        self.extract_comment_metadata = true;
        self
    }

    /// Configures the parser to process `[&W ...]` weight directives.
    ///
    /// Trees without a directive get weight 1.0. Without this option, tree
    /// weights stay unset and weight comments are retained verbatim.
    pub fn with_tree_weights(mut self) -> Self {
        self.track_tree_weights = true;
        self
    }

    /// Disables case folding in taxon label lookup.
    pub fn with_case_sensitive_labels(mut self) -> Self {
        self.namespace.set_case_sensitive(true);
        self
    }

    /// Keeps unquoted underscores in labels instead of folding them to
    /// spaces.
    pub fn with_preserved_underscores(mut self) -> Self {
        self.preserve_underscores = true;
        self
    }

    /// Resolves internal node labels to taxa instead of storing them as
    /// plain strings.
    pub fn with_resolved_internal_taxa(mut self) -> Self {
        self.suppress_internal_taxa = false;
        self
    }

    /// Stores leaf labels as plain strings instead of resolving them to
    /// taxa.
    pub fn with_suppressed_external_taxa(mut self) -> Self {
        self.suppress_external_taxa = true;
        self
    }

    /// Permits repeated labels; each occurrence creates a distinct taxon.
    pub fn with_duplicate_labels(mut self) -> Self {
        self.namespace.set_duplicates_allowed(true);
        self
    }

    /// Replaces the parser's namespace with an existing one.
    ///
    /// Use this to share taxa with previously parsed trees, or to resolve
    /// against a pre-populated, [closed](TaxonNamespace::close) namespace.
    pub fn with_namespace(mut self, namespace: TaxonNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Registers a hook invoked exactly once per node, after all of the
    /// node's fields are set and before control returns to its parent.
    pub fn with_node_finished_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Node) + 'static,
    {
        self.on_node_finished = Some(Box::new(hook));
        self
    }

    /// Returns a reference to the parser's taxon namespace.
    pub fn namespace(&self) -> &TaxonNamespace {
        &self.namespace
    }

    /// Consumes the parser and returns its taxon namespace.
    ///
    /// This should be called after all trees have been parsed to retrieve
    /// the taxa their nodes reference.
    pub fn into_namespace(self) -> TaxonNamespace {
        self.namespace
    }
}

impl Default for NewickTreeParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickTreeParser {
    /// Parses the next tree statement from the token stream.
    ///
    /// Leading `;` tokens are skipped (their comments discarded). The
    /// statement's trailing `;` tokens are consumed, leaving the stream
    /// positioned at the start of the next statement.
    ///
    /// # Returns
    /// * `Ok(Some(tree))` - The parsed tree
    /// * `Ok(None)` - The stream holds no further statement; asking again
    ///   keeps returning `Ok(None)`
    /// * `Err(ParseError)` - The statement is malformed; the stream is left
    ///   wherever the offending token was read
    pub fn parse_next<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
    ) -> Result<Option<Tree>, ParseError> {
        // Prime the tokenizer on first use
        if tokenizer.current().is_none() && !tokenizer.is_at_end() {
            tokenizer.advance()?;
        }

        // Skip statement separators until '(' opens a statement. Comments
        // before a separator are discarded; only the batch immediately
        // preceding '(' belongs to the tree.
        let mut tree_comments = tokenizer.drain_comments();
        loop {
            if tokenizer.current().is_none() {
                return Ok(None);
            }
            if tokenizer.current_is('(') {
                break;
            }
            if tokenizer.current_is(';') {
                if tokenizer.is_at_end() {
                    return Ok(None);
                }
                tokenizer.advance()?;
                tree_comments = tokenizer.drain_comments();
                continue;
            }
            let found = tokenizer
                .current()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            return Err(ParseError::invalid_token(
                tokenizer,
                format!("expecting '(' to open a tree statement but found '{found}'"),
            ));
        }

        let mut tree = Tree::new();
        self.process_tree_comments(&mut tree, tree_comments);

        self.statement_complete = false;
        self.statement_taxa.clear();
        let root = tree.root_index();
        self.parse_node_description(tokenizer, &mut tree, root, None)?;

        if !self.statement_complete {
            let last = tokenizer
                .current()
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            return Err(ParseError::incomplete_statement(
                tokenizer,
                format!(
                    "improperly terminated tree statement (last token read was '{last}' instead of ';')"
                ),
            ));
        }

        // Consume any extra trailing ';' tokens
        loop {
            if !tokenizer.current_is(';') || tokenizer.is_at_end() {
                break;
            }
            tokenizer.clear_comments();
            tokenizer.advance()?;
        }

        Ok(Some(tree))
    }

    /// Parses all tree statements from the token stream until its end.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParseError)` - If any statement fails to parse
    pub fn parse_all<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
    ) -> Result<Vec<Tree>, ParseError> {
        let mut trees = Vec::new();
        while let Some(tree) = self.parse_next(tokenizer)? {
            trees.push(tree);
        }
        Ok(trees)
    }

    /// Consumes the parser and returns an iterator over trees from the
    /// token stream.
    ///
    /// The parser can be retrieved again via [TreeIterator::into_parser].
    pub fn into_iter<S: ByteSource>(self, tokenizer: Tokenizer<S>) -> TreeIterator<S> {
        TreeIterator {
            parser: self,
            tokenizer,
            done: false,
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickTreeParser {
    /// Parses one node description, recursing over nested `(...)` groups.
    ///
    /// Expects the current token to be the '(' opening the node's child
    /// list, or the node's label. On return the current token is the one
    /// that ended the node: its parent's ')' or ',' (not consumed), or the
    /// token following the statement's ';'.
    ///
    /// `is_internal` is [None] only for the root call, where the node kind
    /// is decided after its children (if any) have been parsed; this keeps
    /// single-leaf statements like `(A);` working.
    fn parse_node_description<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
        tree: &mut Tree,
        current: NodeIndex,
        is_internal: Option<bool>,
    ) -> Result<(), ParseError> {
        let mut node_comments = tokenizer.drain_comments();

        if tokenizer.current_is('(') {
            tokenizer.require_advance()?;
            let mut child_created = false;
            loop {
                if tokenizer.current_is(',') {
                    if !child_created {
                        // ',' with no node in the open slot: a preceding
                        // blank child. Not flagged as created, so a trailing
                        // blank can still follow in the event of (..,)
                        self.add_blank_child(tokenizer, tree, current);
                    }
                    tokenizer.require_advance()?;
                    while tokenizer.current_is(',') {
                        // another blank child
                        self.add_blank_child(tokenizer, tree, current);
                        tokenizer.require_advance()?;
                    }
                    if !child_created && tokenizer.current_is(')') {
                        // separator directly before ')': a trailing blank
                        self.add_blank_child(tokenizer, tree, current);
                        child_created = true;
                    }
                } else if tokenizer.current_is(')') {
                    // end of child list
                    tokenizer.require_advance()?;
                    break;
                } else {
                    // a real child: internal if '(' follows, else a leaf
                    let child_is_internal = tokenizer.current_is('(');
                    let child = tree.new_node();
                    let comments = tokenizer.drain_comments();
                    self.attach_node_comments(tree, child, comments);
                    self.parse_node_description(
                        tokenizer,
                        tree,
                        child,
                        Some(child_is_internal),
                    )?;
                    tree.attach_child(current, child);
                    child_created = true;
                }
            }
        }

        let is_internal = match is_internal {
            Some(known) => known,
            None => !tree.node(current).children().is_empty(),
        };

        let mut label_parsed = false;
        loop {
            node_comments.extend(tokenizer.drain_comments());
            if tokenizer.current_is(':') {
                tokenizer.require_advance()?;
                self.parse_edge_length(tokenizer, tree, current)?;
                tokenizer.require_advance()?;
            } else if tokenizer.current_is(')') {
                // closing of parent; the parent's child loop consumes it
                self.attach_node_comments(tree, current, node_comments);
                self.finish_node(tree, current);
                return Ok(());
            } else if tokenizer.current_is(';') {
                // end of tree statement
                self.statement_complete = true;
                tokenizer.advance()?;
                break;
            } else if tokenizer.current_is(',') {
                // end of this node; more siblings follow
                self.attach_node_comments(tree, current, node_comments);
                self.finish_node(tree, current);
                return Ok(());
            } else if tokenizer.current_is('(') {
                return Err(ParseError::malformed_statement(
                    tokenizer,
                    "a node description cannot restart without a separator".to_string(),
                ));
            } else {
                let (text, quoted) = match tokenizer.current() {
                    Some(token) => (token.text().to_string(), token.is_quoted()),
                    None => {
                        return Err(ParseError::incomplete_statement(
                            tokenizer,
                            "stream ended before the tree statement was terminated with ';'"
                                .to_string(),
                        ));
                    }
                };
                if label_parsed {
                    return Err(ParseError::malformed_statement(
                        tokenizer,
                        format!(
                            "expecting ':', ')', ',' or ';' after a label but found '{text}'"
                        ),
                    ));
                }
                let label = if !self.preserve_underscores && !quoted {
                    text.replace('_', " ")
                } else {
                    text
                };
                if (is_internal && self.suppress_internal_taxa)
                    || (!is_internal && self.suppress_external_taxa)
                {
                    tree.node_mut(current).set_label(label);
                } else {
                    let taxon = self.resolve_taxon(tokenizer, &label)?;
                    tree.node_mut(current).set_taxon(taxon);
                }
                label_parsed = true;
                tokenizer.require_advance()?;
            }
        }

        // Reached only via ';': this node ends together with the statement
        self.attach_node_comments(tree, current, node_comments);
        self.finish_node(tree, current);
        Ok(())
    }

    /// Materializes a blank child (no label, no length) under `parent`.
    fn add_blank_child<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
        tree: &mut Tree,
        parent: NodeIndex,
    ) {
        let blank = tree.new_node();
        let comments = tokenizer.drain_comments();
        self.attach_node_comments(tree, blank, comments);
        self.finish_node(tree, blank);
        tree.attach_child(parent, blank);
    }

    /// Parses the token following ':' as this node's edge length.
    ///
    /// When edge lengths are suppressed the token is left for the caller to
    /// discard unseen.
    fn parse_edge_length<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
        tree: &mut Tree,
        node: NodeIndex,
    ) -> Result<(), ParseError> {
        if self.suppress_edge_lengths {
            return Ok(());
        }

        let text = match tokenizer.current() {
            Some(token) => token.text().to_string(),
            None => {
                return Err(ParseError::incomplete_statement(
                    tokenizer,
                    "stream ended where an edge length was expected".to_string(),
                ));
            }
        };

        let length = match self.edge_length_type {
            EdgeLengthType::Float => text.parse::<f64>().ok(),
            EdgeLengthType::Integer => text.parse::<i64>().ok().map(|v| v as f64),
        };

        match length {
            Some(value) => {
                tree.node_mut(node).edge_mut().set_length(value);
                Ok(())
            }
            None => Err(ParseError::malformed_statement(
                tokenizer,
                format!("invalid edge length '{text}'"),
            )),
        }
    }

    /// Resolves a (folded) label to a taxon of the parser's namespace.
    ///
    /// Within one statement, a label may bind the same taxon only once;
    /// repeated labels either fail or, when duplicates are permitted,
    /// create a fresh taxon per occurrence. Across statements, labels
    /// resolve to their existing taxa, which is what lets trees share a
    /// namespace.
    fn resolve_taxon<S: ByteSource>(
        &mut self,
        tokenizer: &mut Tokenizer<S>,
        label: &str,
    ) -> Result<TaxonId, ParseError> {
        if let Some(existing) = self.namespace.resolve(label) {
            if !self.namespace.duplicates_allowed() {
                if self.statement_taxa.contains(&existing) {
                    return Err(ParseError::duplicate_label(tokenizer, label.to_string()));
                }
                self.statement_taxa.insert(existing);
                return Ok(existing);
            }
            if self.namespace.is_closed() {
                // A closed namespace cannot grow, so repeated labels
                // resolve to the existing taxon even when duplicates
                // are permitted
                self.statement_taxa.insert(existing);
                return Ok(existing);
            }
            let id = self.namespace.insert_unchecked(label);
            self.statement_taxa.insert(id);
            return Ok(id);
        }

        if self.namespace.is_closed() {
            return Err(ParseError::unresolved_label(
                tokenizer,
                format!("label '{label}' does not name a taxon in the closed namespace"),
            ));
        }

        let id = self.namespace.insert_unchecked(label);
        self.statement_taxa.insert(id);
        Ok(id)
    }

    /// Applies tree-level comments: the first rooting directive wins,
    /// the first weight directive wins (when tracking is enabled),
    /// metadata lands in the tree's annotations, everything else in its
    /// comment list.
    ///
    /// Also applies the configured rooting and weight defaults when no
    /// directive is found, so this must run exactly once per tree.
    fn process_tree_comments(&mut self, tree: &mut Tree, comments: Vec<String>) {
        let mut rooting_found = false;
        let mut weight_found = false;
        for comment in comments {
            match classify(&comment, self.extract_comment_metadata) {
                CommentField::Rooting(rooted) => {
                    if !rooting_found {
                        tree.set_rootedness(self.resolve_rooting(Some(rooted)));
                        rooting_found = true;
                    }
                }
                CommentField::Weight(weight) => {
                    if self.track_tree_weights {
                        if !weight_found {
                            tree.set_weight(Some(weight));
                            weight_found = true;
                        }
                    } else {
                        // weight directives are kept verbatim when
                        // tracking is off
                        tree.add_comment(comment);
                    }
                }
                CommentField::Metadata(pairs) => {
                    for (key, value) in pairs {
                        tree.annotations_mut().insert(key, value);
                    }
                }
                CommentField::Opaque => tree.add_comment(comment),
            }
        }

        if !rooting_found {
            tree.set_rootedness(self.resolve_rooting(None));
        }
        if self.track_tree_weights && !weight_found {
            tree.set_weight(Some(DEFAULT_TREE_WEIGHT));
        }
    }

    /// Rootedness for a tree with the given directive (if any) under the
    /// configured policy.
    fn resolve_rooting(&self, directive: Option<bool>) -> Rootedness {
        match (self.rooting, directive) {
            (RootingPolicy::ForceUnrooted, _) => Rootedness::Unrooted,
            (RootingPolicy::ForceRooted, _) => Rootedness::Rooted,
            (_, Some(true)) => Rootedness::Rooted,
            (_, Some(false)) => Rootedness::Unrooted,
            (RootingPolicy::DefaultRooted, None) => Rootedness::Rooted,
            (RootingPolicy::DefaultUnrooted, None) => Rootedness::Unrooted,
            (RootingPolicy::Unknown, None) => Rootedness::Unknown,
        }
    }

    /// Applies node-level comments. Rooting and weight directives carry no
    /// meaning on nodes and are retained as opaque comments.
    fn attach_node_comments(&self, tree: &mut Tree, node: NodeIndex, comments: Vec<String>) {
        for comment in comments {
            match classify(&comment, self.extract_comment_metadata) {
                CommentField::Metadata(pairs) => {
                    let annotations = tree.node_mut(node).annotations_mut();
                    for (key, value) in pairs {
                        annotations.insert(key, value);
                    }
                }
                _ => tree.node_mut(node).add_comment(comment),
            }
        }
    }

    /// Runs the node-finished hook, if one is configured.
    fn finish_node(&mut self, tree: &mut Tree, node: NodeIndex) {
        if let Some(callback) = self.on_node_finished.as_mut() {
            callback(tree.node_mut(node));
        }
    }
}

// =#========================================================================#=
// TREE ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator lazily parsing tree statements.
///
/// Created by [NewickTreeParser::into_iter]. Yields
/// `Result<Tree, ParseError>` per statement; the sequence is single-pass
/// and cannot be restarted. After an error, iteration ends.
///
/// After iteration, the underlying [NewickTreeParser] can be retrieved via
/// [into_parser()](Self::into_parser), e.g. to access the taxon namespace.
pub struct TreeIterator<S: ByteSource> {
    parser: NewickTreeParser,
    tokenizer: Tokenizer<S>,
    done: bool,
}

impl<S: ByteSource> TreeIterator<S> {
    /// Consumes the iterator and returns the underlying [NewickTreeParser].
    pub fn into_parser(self) -> NewickTreeParser {
        self.parser
    }
}

impl<S: ByteSource> Iterator for TreeIterator<S> {
    type Item = Result<Tree, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parser.parse_next(&mut self.tokenizer) {
            Ok(Some(tree)) => Some(Ok(tree)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
