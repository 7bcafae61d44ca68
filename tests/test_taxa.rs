use treewick::model::{TaxonError, TaxonNamespace};
use treewick::newick::NewickTreeParser;
use treewick::parser::{ParseErrorKind, Tokenizer};

// --- TESTS NAMESPACE (standalone) ---

#[test]
fn test_add_and_resolve() {
    let mut taxa = TaxonNamespace::new();
    let puffin = taxa.add_taxon("Fratercula arctica").unwrap();
    let murre = taxa.add_taxon("Uria aalge").unwrap();

    assert_eq!(taxa.num_taxa(), 2);
    assert_eq!(taxa[puffin].label(), "Fratercula arctica");
    assert_eq!(taxa.resolve("Uria aalge"), Some(murre));
    assert_eq!(taxa.resolve("Alca torda"), None);
}

#[test]
fn test_lookup_normalizes_case_by_default() {
    let mut taxa = TaxonNamespace::new();
    let id = taxa.add_taxon("Pinguinus impennis").unwrap();

    assert_eq!(taxa.resolve("PINGUINUS IMPENNIS"), Some(id));
    // The stored label keeps its original case
    assert_eq!(taxa[id].label(), "Pinguinus impennis");

    let err = taxa.add_taxon("pinguinus impennis").unwrap_err();
    assert_eq!(
        err,
        TaxonError::DuplicateLabel("pinguinus impennis".to_string())
    );
}

#[test]
fn test_case_sensitive_lookup() {
    let mut taxa = TaxonNamespace::new().with_case_sensitive_labels();
    taxa.add_taxon("Alle alle").unwrap();
    taxa.add_taxon("ALLE ALLE").unwrap();

    assert_eq!(taxa.num_taxa(), 2);
    assert_ne!(taxa.resolve("Alle alle"), taxa.resolve("ALLE ALLE"));
}

#[test]
fn test_closed_namespace_rejects_additions() {
    let mut taxa = TaxonNamespace::new();
    taxa.add_taxon("Alca torda").unwrap();
    taxa.close();

    assert!(taxa.is_closed());
    let err = taxa.add_taxon("Uria lomvia").unwrap_err();
    assert!(matches!(err, TaxonError::NamespaceClosed(_)));
    // Existing entries still resolve
    assert!(taxa.resolve("Alca torda").is_some());
}

#[test]
fn test_taxa_keep_creation_order() {
    let mut taxa = TaxonNamespace::new();
    taxa.add_taxon("C").unwrap();
    taxa.add_taxon("A").unwrap();
    taxa.add_taxon("B").unwrap();

    let labels: Vec<&str> = taxa.iter().map(|t| t.label()).collect();
    assert_eq!(labels, vec!["C", "A", "B"]);
}

// --- TESTS LABEL RESOLUTION DURING PARSING ---

#[test]
fn test_duplicate_label_within_statement_fails() {
    let mut tokenizer = Tokenizer::for_str("(A,A);");
    let mut parser = NewickTreeParser::new();
    let err = parser.parse_next(&mut tokenizer).unwrap_err();

    assert_eq!(*err.kind(), ParseErrorKind::DuplicateLabel("A".to_string()));
}

#[test]
fn test_duplicate_labels_allowed_create_distinct_taxa() {
    let mut tokenizer = Tokenizer::for_str("(A,A);");
    let mut parser = NewickTreeParser::new().with_duplicate_labels();
    let tree = parser.parse_next(&mut tokenizer).unwrap().unwrap();
    let taxa = parser.into_namespace();

    assert_eq!(taxa.num_taxa(), 2);
    let children = tree.root().children().to_vec();
    let first = tree.node(children[0]).taxon().unwrap();
    let second = tree.node(children[1]).taxon().unwrap();
    assert_ne!(first, second);
    assert_eq!(taxa[first].label(), "A");
    assert_eq!(taxa[second].label(), "A");
}

#[test]
fn test_duplicate_detection_ignores_case_by_default() {
    let mut tokenizer = Tokenizer::for_str("(Apa,APA);");
    let mut parser = NewickTreeParser::new();
    let err = parser.parse_next(&mut tokenizer).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::DuplicateLabel(_)));
}

#[test]
fn test_case_sensitive_labels_during_parsing() {
    let mut tokenizer = Tokenizer::for_str("(Apa,APA);");
    let mut parser = NewickTreeParser::new().with_case_sensitive_labels();
    parser.parse_next(&mut tokenizer).unwrap().unwrap();

    assert_eq!(parser.namespace().num_taxa(), 2);
}

#[test]
fn test_trees_share_taxa_across_statements() {
    let mut tokenizer = Tokenizer::for_str("(A,B);(B,A);");
    let mut parser = NewickTreeParser::new();
    let trees = parser.parse_all(&mut tokenizer).unwrap();
    let taxa = parser.into_namespace();

    assert_eq!(taxa.num_taxa(), 2);

    // The same labels bind the same taxon identities in both trees
    let first_children = trees[0].root().children().to_vec();
    let second_children = trees[1].root().children().to_vec();
    let a = trees[0].node(first_children[0]).taxon().unwrap();
    let b = trees[0].node(first_children[1]).taxon().unwrap();
    assert_eq!(trees[1].node(second_children[0]).taxon(), Some(b));
    assert_eq!(trees[1].node(second_children[1]).taxon(), Some(a));
}

#[test]
fn test_closed_namespace_resolves_known_labels() {
    let mut taxa = TaxonNamespace::new();
    taxa.add_taxon("A").unwrap();
    taxa.add_taxon("B").unwrap();
    taxa.close();

    let mut tokenizer = Tokenizer::for_str("(B,A);");
    let mut parser = NewickTreeParser::new().with_namespace(taxa);
    let tree = parser.parse_next(&mut tokenizer).unwrap().unwrap();
    let taxa = parser.into_namespace();

    assert_eq!(taxa.num_taxa(), 2);
    let children = tree.root().children().to_vec();
    assert_eq!(taxa[tree.node(children[0]).taxon().unwrap()].label(), "B");
}

#[test]
fn test_closed_namespace_rejects_unknown_labels() {
    let mut taxa = TaxonNamespace::new();
    taxa.add_taxon("A").unwrap();
    taxa.close();

    let mut tokenizer = Tokenizer::for_str("(A,C);");
    let mut parser = NewickTreeParser::new().with_namespace(taxa);
    let err = parser.parse_next(&mut tokenizer).unwrap_err();

    assert!(matches!(err.kind(), ParseErrorKind::UnresolvedLabel(_)));
}

// --- TESTS TAXON SUPPRESSION POLICIES ---

#[test]
fn test_suppressed_external_taxa() {
    let mut tokenizer = Tokenizer::for_str("(A,B);");
    let mut parser = NewickTreeParser::new().with_suppressed_external_taxa();
    let tree = parser.parse_next(&mut tokenizer).unwrap().unwrap();

    assert!(parser.namespace().is_empty());
    let children = tree.root().children().to_vec();
    let leaf = tree.node(children[0]);
    assert_eq!(leaf.label(), Some("A"));
    assert!(leaf.taxon().is_none());
}

#[test]
fn test_resolved_internal_taxa() {
    let mut tokenizer = Tokenizer::for_str("((A,B)AB,C);");
    let mut parser = NewickTreeParser::new().with_resolved_internal_taxa();
    let tree = parser.parse_next(&mut tokenizer).unwrap().unwrap();
    let taxa = parser.into_namespace();

    assert_eq!(taxa.num_taxa(), 4);
    let children = tree.root().children().to_vec();
    let inner = tree.node(children[0]);
    assert_eq!(taxa[inner.taxon().unwrap()].label(), "AB");
    assert!(inner.label().is_none());
}
