//! Per-document facts.
//!
//! Extraction runs once per successfully parsed document; every rule then
//! reads the same [`DocumentFacts`]. Facts that no active rule needs (see
//! [`RuleMask`]) are left empty.

use super::extract::{
    NamedRange, extract_dependency_identifiers, extract_key_paths, extract_named_ranges, extract_references,
};
use super::rule_set::RuleMask;
use crate::{Document, NestedValue};

/// Structural facts of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFacts {
    /// Key paths in pre-order, as emitted by `extract_key_paths`.
    pub key_paths: Vec<String>,
    /// `${...}` tokens in scan order.
    pub references: Vec<String>,
    /// Declared dependency identifiers, without repeats.
    pub dependencies: Vec<String>,
    /// `{min, max}` ranges keyed by path.
    pub ranges: Vec<(String, NamedRange)>,
}

impl DocumentFacts {
    /// Extract the facts `mask` asks for.
    pub fn extract(value: &NestedValue, mask: RuleMask) -> Self {
        DocumentFacts {
            key_paths: if mask.needs_key_paths() { extract_key_paths(value) } else { Vec::new() },
            references: if mask.needs_references() { extract_references(value) } else { Vec::new() },
            dependencies: if mask.needs_dependencies() { extract_dependency_identifiers(value) } else { Vec::new() },
            ranges: if mask.needs_ranges() { extract_named_ranges(value) } else { Vec::new() },
        }
    }

    /// Extract every fact regardless of which rules are enabled.
    pub fn extract_all(value: &NestedValue) -> Self {
        Self::extract(value, RuleMask::all())
    }
}

/// A parsed document together with its extracted facts: the input every rule
/// evaluates.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedDocument {
    pub document: Document,
    pub facts: DocumentFacts,
}

impl AnalyzedDocument {
    pub fn new(document: Document, value: &NestedValue, mask: RuleMask) -> Self {
        Self { document, facts: DocumentFacts::extract(value, mask) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NestedValue {
        NestedValue::from(json!({
            "dependencies": ["cursor:b.md"],
            "style": {"indent": "${tabs}"},
            "width": {"min": 1, "max": 4},
        }))
    }

    #[test]
    fn full_mask_extracts_everything() {
        let facts = DocumentFacts::extract_all(&sample());

        assert_eq!(facts.key_paths, vec!["dependencies", "style", "style.indent", "width", "width.max", "width.min"]);
        assert_eq!(facts.references, vec!["tabs"]);
        assert_eq!(facts.dependencies, vec!["cursor:b.md"]);
        assert_eq!(facts.ranges, vec![("width".to_string(), NamedRange::new(1.0, 4.0))]);
    }

    #[test]
    fn disabled_rules_skip_their_facts() {
        let facts = DocumentFacts::extract(&sample(), RuleMask::RANGE_CONFLICT);

        assert!(facts.key_paths.is_empty());
        assert!(facts.references.is_empty());
        assert!(facts.dependencies.is_empty());
        assert_eq!(facts.ranges.len(), 1);
    }

    #[test]
    fn empty_mask_extracts_nothing() {
        assert_eq!(DocumentFacts::extract(&sample(), RuleMask::empty()), DocumentFacts::default());
    }
}
