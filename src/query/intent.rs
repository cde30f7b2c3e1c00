//! Intent classification.
//!
//! The keyword table is data-driven so new shapes and intents extend the
//! tables, not the control flow. Intent priority is the fixed list below;
//! the first matching rule wins and anything unmatched falls back to the
//! help catalog.

use super::tokenizer::Token;
use crate::types::ShapeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Create,
    Compare,
    Property,
    DimAnalysis,
    Explain,
    List,
    Help,
}

/// Fixed priority list. A keyword containing a space matches consecutive
/// word tokens; anything else matches as a substring of a single word.
const INTENT_RULES: &[(QueryIntent, &[&str])] = &[
    (QueryIntent::Create, &["create", "make"]),
    (QueryIntent::Compare, &["compare", "vs", "versus"]),
    (QueryIntent::Property, &["volume", "area", "surface"]),
    (QueryIntent::DimAnalysis, &["dimension", "scale", "how does"]),
    (QueryIntent::Explain, &["explain", "formula", "why"]),
    (QueryIntent::List, &["list", "show"]),
];

/// Shape keyword table, scanned per word token in order.
pub const SHAPE_KEYWORDS: &[(&str, ShapeKind)] = &[
    ("sphere", ShapeKind::Sphere),
    ("ball", ShapeKind::Sphere),
    ("cube", ShapeKind::Cube),
    ("tesseract", ShapeKind::Cube),
    ("ellipsoid", ShapeKind::Ellipsoid),
    ("simplex", ShapeKind::Simplex),
    ("triangle", ShapeKind::Simplex),
    ("tetrahedron", ShapeKind::Simplex),
    ("pyramid", ShapeKind::Pyramid),
];

pub fn classify(tokens: &[Token]) -> QueryIntent {
    for (intent, keywords) in INTENT_RULES {
        if keywords.iter().any(|kw| matches_keyword(tokens, kw)) {
            return *intent;
        }
    }
    QueryIntent::Help
}

fn matches_keyword(tokens: &[Token], keyword: &str) -> bool {
    if let Some((first, rest)) = keyword.split_once(' ') {
        // Phrase keyword: consecutive word tokens
        tokens.windows(2).any(|pair| {
            pair[0].as_word() == Some(first) && pair[1].as_word() == Some(rest)
        })
    } else {
        tokens
            .iter()
            .filter_map(Token::as_word)
            .any(|w| w.contains(keyword))
    }
}

/// Shape kinds mentioned in the text, in order of appearance.
pub fn mentioned_shapes(tokens: &[Token]) -> Vec<ShapeKind> {
    let mut kinds = Vec::new();
    for word in tokens.iter().filter_map(Token::as_word) {
        for (keyword, kind) in SHAPE_KEYWORDS {
            if word.contains(keyword) {
                kinds.push(*kind);
                break;
            }
        }
    }
    kinds
}

/// First mentioned shape kind; the dispatcher defaults to a sphere.
pub fn primary_shape(tokens: &[Token]) -> ShapeKind {
    mentioned_shapes(tokens)
        .first()
        .copied()
        .unwrap_or(ShapeKind::Sphere)
}
