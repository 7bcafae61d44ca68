use criterion::{Criterion, criterion_group, criterion_main};
use treewick::newick::NewickTreeParser;
use treewick::parser::Tokenizer;

/// Balanced binary subtree with 2^depth leaves, labels shared across trees.
fn balanced_subtree(depth: usize, next_leaf: &mut usize) -> String {
    if depth == 0 {
        *next_leaf += 1;
        format!("t{}:1.0", next_leaf)
    } else {
        format!(
            "({},{}):0.5",
            balanced_subtree(depth - 1, next_leaf),
            balanced_subtree(depth - 1, next_leaf)
        )
    }
}

/// A stream of `num_trees` identical-topology statements over shared taxa.
fn tree_stream(depth: usize, num_trees: usize) -> String {
    let mut next_leaf = 0;
    let statement = format!("{};\n", balanced_subtree(depth, &mut next_leaf));
    statement.repeat(num_trees)
}

fn parse_lazy(input: &str) {
    let tokenizer = Tokenizer::for_str(input);
    let parser = NewickTreeParser::new();
    for tree in parser.into_iter(tokenizer) {
        let _tree = tree.unwrap();
    }
}

fn newick_parsing(c: &mut Criterion) {
    for (name, depth, num_trees) in [("n64-t100", 6, 100), ("n512-t20", 9, 20)] {
        let input = tree_stream(depth, num_trees);
        c.bench_function(name, |b| {
            b.iter(|| parse_lazy(&input));
        });
    }
}

criterion_group!(benches, newick_parsing);
criterion_main!(benches);
