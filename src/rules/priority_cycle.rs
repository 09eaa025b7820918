//! `priority-cycle`: `dependencies` declarations that loop back on themselves.
//!
//! ```text
//! copilot:a.yml --> cursor:b.md --> claude:c.yml --+
//!       ^                                          |
//!       +------------------------------------------+
//!
//! Priority cycle detected:
//!   copilot:a.yml -> cursor:b.md -> claude:c.yml -> copilot:a.yml
//! ```
//!
//! The violation is attributed to the document behind the cycle's first node,
//! or to `unknown` when that identity belongs to no parsed document.

use crate::engine::{AnalyzedDocument, DependencyGraph};
use crate::{Level, RuleId, Violation};
use std::collections::HashMap;

const UNKNOWN_FILE: &str = "unknown";

pub(crate) fn check(documents: &[AnalyzedDocument], level: Level) -> Vec<Violation> {
    let mut graph = DependencyGraph::default();
    let mut owners: HashMap<String, &str> = HashMap::new();

    for analyzed in documents {
        let identity = analyzed.document.identity();
        if !analyzed.facts.dependencies.is_empty() {
            graph.insert(identity.clone(), analyzed.facts.dependencies.clone());
        }
        owners.entry(identity).or_insert(analyzed.document.path.as_str());
    }

    if graph.is_empty() {
        return Vec::new();
    }

    graph
        .find_cycles()
        .into_iter()
        .map(|cycle| {
            let file = cycle.first().and_then(|node| owners.get(node)).copied().unwrap_or(UNKNOWN_FILE);
            Violation::new(
                RuleId::PriorityCycle,
                level,
                format!("Priority cycle detected: {}", cycle.join(" -> ")),
                file,
            )
        })
        .collect()
}
