//! # Prompt Expander
//!
//! Turns a raw prompt string into the sorted set of atomic tag variants used by
//! the word index.
//!
//! Each segment goes through, in order: wildcard-reference removal, weight
//! stripping and expansion of its first variation group. Candidates that are
//! blank or still contain `__` are dropped.
//!
//! # Examples
//!
//! ```rust
//! use plab_core::expander::expand;
//!
//! let expansion = expand("red {cat|dog}, __style__, weight:0.8");
//! assert_eq!(expansion.words(), vec!["red cat", "red dog", "weight"]);
//! ```

use crate::parser::{find_variation_group, parse_segments, split_weight, wildcard_reference};
use std::collections::BTreeSet;

const WILDCARD_MARKER: &str = "__";

/// The sorted, deduplicated variants of a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    variants: BTreeSet<String>,
}

impl Expansion {
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    /// The variants as index words, ascending.
    pub fn words(&self) -> Vec<String> {
        self.variants.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Expands a raw prompt. Never fails: any input yields a (possibly empty) set.
pub fn expand(raw: &str) -> Expansion {
    let segments = match parse_segments(raw) {
        Ok((_, segments)) => segments,
        Err(_) => Vec::new(),
    };

    let variants = segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .flat_map(expand_segment)
        .filter_map(|candidate| {
            let candidate = candidate.trim();
            if candidate.is_empty() || candidate.contains(WILDCARD_MARKER) {
                None
            } else {
                Some(candidate.to_string())
            }
        })
        .collect();

    Expansion { variants }
}

fn expand_segment(segment: &str) -> Vec<String> {
    if let Some(name) = wildcard_reference(segment) {
        log::trace!("Skipping wildcard reference: {}", name);
        return Vec::new();
    }

    let (tag, _weight) = split_weight(segment);
    if tag.is_empty() {
        return Vec::new();
    }

    match find_variation_group(tag) {
        Some(group) => group
            .alternatives()
            .map(|alternative| group.substitute(alternative))
            .collect(),
        None => vec![tag.to_string()],
    }
}
