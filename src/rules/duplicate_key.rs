//! `duplicate-key`: the same key path declared by more than one tool.
//!
//! The first document to declare a key seeds the registry entry. Every later
//! declaration is probed against that entry: a tool not seen yet for the key is
//! recorded and reported against the *current* document. Repeats within one
//! tool are never reported.
//!
//! Key paths include every ancestor of a leaf, so a shared subtree collides on
//! its root first. Collisions below a key already reported for the same
//! document are recorded in the registry but folded into that report.

use crate::engine::AnalyzedDocument;
use crate::{Level, RuleId, Violation};
use std::collections::HashMap;

struct KeyEntry<'a> {
    first_file: &'a str,
    tools: Vec<&'a str>,
}

/// Report cross-tool key collisions.
///
/// A folded child collision is not reported on its own, so the parent's
/// message lists the tools sharing the parent key; a tool listed there does
/// not necessarily declare the child path too.
pub(crate) fn check(documents: &[AnalyzedDocument], level: Level) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut registry: HashMap<&str, KeyEntry<'_>> = HashMap::new();

    for analyzed in documents {
        let tool = analyzed.document.tool.as_str();
        let file = analyzed.document.path.as_str();
        let mut reported: Vec<&str> = Vec::new();

        for key in &analyzed.facts.key_paths {
            let Some(entry) = registry.get_mut(key.as_str()) else {
                registry.insert(key, KeyEntry { first_file: file, tools: vec![tool] });
                continue;
            };
            if entry.tools.contains(&tool) {
                continue;
            }
            entry.tools.push(tool);

            if reported.iter().any(|parent| is_below(key, parent)) {
                tracing::trace!(key = %key, file, "collision folded into parent key");
                continue;
            }
            tracing::trace!(key = %key, file, first = entry.first_file, "cross-tool key collision");
            reported.push(key);
            violations.push(Violation::new(
                RuleId::DuplicateKey,
                level,
                format!("Duplicate key \"{key}\" found across tools: {}", entry.tools.join(", ")),
                file,
            ));
        }
    }

    violations
}

fn is_below(key: &str, parent: &str) -> bool {
    key.len() > parent.len() && key.starts_with(parent) && key.as_bytes()[parent.len()] == b'.'
}
