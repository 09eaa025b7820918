//! `range-conflict`: overlapping `{min, max}` ranges under the same key path.
//!
//! The first declaration of a key owns it. Later declarations are compared
//! against that first one only; an overlap is reported against the current
//! document, a disjoint re-declaration is ignored and does not replace it.

use crate::engine::{AnalyzedDocument, NamedRange, ranges_overlap};
use crate::{Level, RuleId, Violation};
use std::collections::HashMap;

struct RangeEntry<'a> {
    range: NamedRange,
    file: &'a str,
}

pub(crate) fn check(documents: &[AnalyzedDocument], level: Level) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut registry: HashMap<&str, RangeEntry<'_>> = HashMap::new();

    for analyzed in documents {
        let file = analyzed.document.path.as_str();

        for (key, range) in &analyzed.facts.ranges {
            let Some(existing) = registry.get(key.as_str()) else {
                registry.insert(key, RangeEntry { range: *range, file });
                continue;
            };
            if !ranges_overlap(&existing.range, range) {
                continue;
            }
            tracing::trace!(key = %key, file, first = existing.file, "overlapping range");
            violations.push(Violation::new(
                RuleId::RangeConflict,
                level,
                format!("Range conflict for \"{key}\": {} vs {}", existing.range, range),
                file,
            ));
        }
    }

    violations
}
