//! Classification of inline `[...]` comments.
//!
//! Newick sources overload comments for several purposes: rooting
//! directives (`[&R]`, `[&U]`), tree weights (`[&W 1/2]`), structured
//! metadata (`[&rate=0.5,pop=12]`, `[&&NHX:S=Aves]`), and free text. This
//! module inspects a raw comment body and decides which of these it is.

use crate::model::annotation::AnnotationValue;
use crate::newick::defs::{NHX_PREFIX, ROOTED_DIRECTIVES, UNROOTED_DIRECTIVES, WEIGHT_SIGILS};

// =#========================================================================#=
// COMMENT FIELD
// =#========================================================================#=
/// The interpretation of one raw comment body.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentField {
    /// A rooting directive: `true` for `&R`, `false` for `&U`
    Rooting(bool),
    /// A tree-weight directive with its parsed value
    Weight(f64),
    /// Structured `key=value` metadata
    Metadata(Vec<(String, AnnotationValue)>),
    /// Anything else; retained verbatim on the owning entity
    Opaque,
}

/// Classifies a raw comment body (without brackets).
///
/// The weight grammar accepts an integer, a rational `int/int`, or a
/// decimal after the `&W` sigil. A comment with the sigil but a malformed
/// payload is swallowed into [Opaque](CommentField::Opaque) rather than
/// reported. This leniency applies to the weight grammar only.
///
/// # Arguments
/// * `comment` - The comment body, brackets stripped
/// * `extract_metadata` - Whether `&`/`&&` comments are parsed as
///   `key=value` metadata; when `false` they classify as Opaque
pub fn classify(comment: &str, extract_metadata: bool) -> CommentField {
    if ROOTED_DIRECTIVES.contains(&comment) {
        return CommentField::Rooting(true);
    }
    if UNROOTED_DIRECTIVES.contains(&comment) {
        return CommentField::Rooting(false);
    }

    if let Some(payload) = strip_weight_sigil(comment) {
        return match parse_weight(payload) {
            Some(weight) => CommentField::Weight(weight),
            None => CommentField::Opaque,
        };
    }

    if extract_metadata && comment.starts_with('&') {
        let pairs = parse_metadata(comment);
        if !pairs.is_empty() {
            return CommentField::Metadata(pairs);
        }
    }

    CommentField::Opaque
}

/// Returns the payload following the `&W` sigil, if present.
fn strip_weight_sigil(comment: &str) -> Option<&str> {
    WEIGHT_SIGILS
        .iter()
        .find_map(|sigil| comment.strip_prefix(sigil))
}

/// Parses a weight expression: `int`, `int/int`, or decimal.
///
/// Returns [None] on any malformed payload, including division by zero.
fn parse_weight(payload: &str) -> Option<f64> {
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }

    if let Some((numerator, denominator)) = payload.split_once('/') {
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    payload.parse().ok()
}

/// Parses an `&`/`&&` comment body as `key=value` metadata.
///
/// BEAST-style comments use ','-separated fields, NHX-style comments
/// (`&&NHX:...`) use ':'. Surrounding whitespace of keys and values is
/// stripped. Returns an empty Vec if any field fails the grammar, which
/// demotes the whole comment to opaque.
fn parse_metadata(comment: &str) -> Vec<(String, AnnotationValue)> {
    let (body, separator) = if let Some(rest) = comment.strip_prefix(NHX_PREFIX) {
        (rest, ':')
    } else if let Some(rest) = comment.strip_prefix("&&") {
        (rest, ',')
    } else if let Some(rest) = comment.strip_prefix('&') {
        (rest, ',')
    } else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for field in body.split(separator) {
        let Some((key, value)) = field.split_once('=') else {
            return Vec::new();
        };
        let key = key.trim();
        if key.is_empty() {
            return Vec::new();
        }
        pairs.push((key.to_string(), AnnotationValue::from_text(value.trim())));
    }
    pairs
}

// =#========================================================================#=
// TESTS - COMMENT CLASSIFICATION
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooting_directives() {
        assert_eq!(classify("&R", false), CommentField::Rooting(true));
        assert_eq!(classify("&r", false), CommentField::Rooting(true));
        assert_eq!(classify("&U", false), CommentField::Rooting(false));
        assert_eq!(classify("&u", false), CommentField::Rooting(false));
        // Only the bare two-character token is a directive
        assert_eq!(classify("&R ", false), CommentField::Opaque);
    }

    #[test]
    fn test_weight_directives() {
        assert_eq!(classify("&W 2", false), CommentField::Weight(2.0));
        assert_eq!(classify("&W 1/2", false), CommentField::Weight(0.5));
        assert_eq!(classify("&w 0.25", false), CommentField::Weight(0.25));
        assert_eq!(classify("&W0.25", false), CommentField::Weight(0.25));
    }

    #[test]
    fn test_malformed_weight_is_swallowed() {
        assert_eq!(classify("&W", false), CommentField::Opaque);
        assert_eq!(classify("&W abc", false), CommentField::Opaque);
        assert_eq!(classify("&W 1/0", false), CommentField::Opaque);
        // The weight sigil shadows metadata extraction
        assert_eq!(classify("&W x=1", true), CommentField::Opaque);
    }

    #[test]
    fn test_metadata_extraction() {
        let field = classify("&rate=0.5,pop=12", true);
        let CommentField::Metadata(pairs) = field else {
            panic!("expected metadata, got {field:?}");
        };
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "rate");
        assert_eq!(pairs[0].1, AnnotationValue::Float(0.5));
        assert_eq!(pairs[1].1, AnnotationValue::Int(12));
    }

    #[test]
    fn test_metadata_whitespace_is_stripped() {
        let field = classify("& clade = mammals ", true);
        let CommentField::Metadata(pairs) = field else {
            panic!("expected metadata, got {field:?}");
        };
        assert_eq!(pairs[0].0, "clade");
        assert_eq!(pairs[0].1, AnnotationValue::String("mammals".to_string()));
    }

    #[test]
    fn test_nhx_metadata() {
        let field = classify("&&NHX:S=Aves:D=N", true);
        let CommentField::Metadata(pairs) = field else {
            panic!("expected metadata, got {field:?}");
        };
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "S");
        assert_eq!(pairs[1].0, "D");
    }

    #[test]
    fn test_metadata_disabled_or_malformed_is_opaque() {
        assert_eq!(classify("&rate=0.5", false), CommentField::Opaque);
        assert_eq!(classify("&no pairs here", true), CommentField::Opaque);
        assert_eq!(classify("just a note", true), CommentField::Opaque);
        assert_eq!(classify("&", true), CommentField::Opaque);
    }
}
