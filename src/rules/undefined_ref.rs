//! `undefined-ref`: a `${...}` token that names no key path in the corpus.
//!
//! Resolution is an exact string match against the union of all documents'
//! key paths; there is no prefix or pattern matching.

use crate::engine::AnalyzedDocument;
use crate::{Level, RuleId, Violation};
use std::collections::HashSet;

pub(crate) fn check(documents: &[AnalyzedDocument], level: Level) -> Vec<Violation> {
    let known: HashSet<&str> =
        documents.iter().flat_map(|d| d.facts.key_paths.iter().map(String::as_str)).collect();

    documents
        .iter()
        .flat_map(|analyzed| {
            analyzed.facts.references.iter().filter(|token| !known.contains(token.as_str())).map(|token| {
                Violation::new(
                    RuleId::UndefinedRef,
                    level,
                    format!("Undefined reference \"{token}\" found"),
                    &analyzed.document.path,
                )
            })
        })
        .collect()
}
