//! Slot extraction from token streams.
//!
//! Rules are deterministic and order-insensitive within a request: the
//! dimension is the first integer glued to a dimension word, the primary
//! parameter is the first numeric literal next to a parameter keyword.

use super::tokenizer::Token;
use crate::types::PropertyKind;

/// Keywords a parameter literal may follow or precede.
const PARAMETER_KEYWORDS: &[&str] = &["radius", "side", "edge", "length", "of", "is"];

/// Words introducing an explicit shape name.
const NAME_KEYWORDS: &[&str] = &["named", "called"];

/// First `<digits> d` / `<digits> dimensional` match, with the token
/// indexes it consumed so parameter extraction can skip them.
pub fn extract_dimension(tokens: &[Token]) -> Option<(u32, [usize; 2])> {
    for i in 0..tokens.len().saturating_sub(1) {
        let Some(value) = tokens[i].as_number() else {
            continue;
        };
        let Some(word) = tokens[i + 1].as_word() else {
            continue;
        };
        if word == "d" || word.starts_with("dimension") {
            if value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
                return Some((value as u32, [i, i + 1]));
            }
        }
    }
    None
}

/// First numeric literal adjacent to a parameter keyword, skipping the
/// tokens the dimension match consumed. A literal directly after a keyword
/// wins over one directly before.
pub fn extract_parameter(tokens: &[Token], consumed: &[usize]) -> Option<f64> {
    let is_keyword = |index: usize| -> bool {
        match &tokens[index] {
            Token::Word(w) => PARAMETER_KEYWORDS.contains(&w.as_str()),
            Token::Symbol('=') => true,
            _ => false,
        }
    };

    // Literal following a keyword
    for i in 0..tokens.len() {
        if consumed.contains(&i) {
            continue;
        }
        let Some(value) = tokens[i].as_number() else {
            continue;
        };
        if let Some(prev) = previous_index(i, consumed) {
            if is_keyword(prev) {
                return Some(value);
            }
        }
    }

    // Literal preceding a keyword
    for i in 0..tokens.len() {
        if consumed.contains(&i) {
            continue;
        }
        let Some(value) = tokens[i].as_number() else {
            continue;
        };
        if let Some(next) = next_index(i, consumed, tokens.len()) {
            if is_keyword(next) {
                return Some(value);
            }
        }
    }

    None
}

fn previous_index(i: usize, consumed: &[usize]) -> Option<usize> {
    (0..i).rev().find(|j| !consumed.contains(j))
}

fn next_index(i: usize, consumed: &[usize], len: usize) -> Option<usize> {
    ((i + 1)..len).find(|j| !consumed.contains(j))
}

/// Requested property for a `property` query.
pub fn extract_property(tokens: &[Token]) -> PropertyKind {
    let has = |needle: &str| {
        tokens
            .iter()
            .filter_map(Token::as_word)
            .any(|w| w.contains(needle))
    };
    let wants_volume = has("volume");
    let wants_surface = has("surface") || has("area");
    match (wants_volume, wants_surface) {
        (true, true) => PropertyKind::Both,
        (false, true) => PropertyKind::Surface,
        _ => PropertyKind::Volume,
    }
}

/// Property for a dimensional-analysis sweep; `None` means generic.
pub fn extract_sweep_property(tokens: &[Token]) -> Option<PropertyKind> {
    let has = |needle: &str| {
        tokens
            .iter()
            .filter_map(Token::as_word)
            .any(|w| w.contains(needle))
    };
    if has("volume") {
        Some(PropertyKind::Volume)
    } else if has("surface") || has("area") {
        Some(PropertyKind::Surface)
    } else {
        None
    }
}

/// Explicit name following "named"/"called", if any.
pub fn extract_name(tokens: &[Token]) -> Option<String> {
    for i in 0..tokens.len().saturating_sub(1) {
        if let Some(word) = tokens[i].as_word() {
            if NAME_KEYWORDS.contains(&word) {
                if let Some(name) = tokens[i + 1].as_word() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}
