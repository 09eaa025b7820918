//! Detection orchestrator.
//!
//! A run moves through `Idle -> Parsing -> Evaluating -> Done`:
//!
//! ```text
//! documents ──▶ parse all (awaited together) ──▶ extract facts ──▶ rules ──▶ violations
//!                  │
//!                  └─ Err(_) -> one `parse-error` violation, document dropped
//! ```
//!
//! Parses are independent of each other, so they are issued together and the
//! run waits for all of them before any rule looks at the corpus: the rules
//! need the complete key and range universe. A failed parse is never retried
//! and never stops the run.

use super::facts::AnalyzedDocument;
use super::metrics::{RuleMetrics, RunMetrics, RunResult};
use super::rule_set::{RuleMask, active_rules};
use crate::parse::DocumentParser;
use crate::{Document, Level, RuleId, RuleLevels, Violation};
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs the consistency rules over a set of documents.
///
/// Usage: create with `StaticEngine::new(levels)`, then call
/// [`analyze`](Self::analyze) with the documents and a parser. The engine holds
/// no state between runs.
#[derive(Debug, Clone)]
pub struct StaticEngine {
    levels: RuleLevels,
    mask: RuleMask,
}

impl StaticEngine {
    pub fn new(levels: RuleLevels) -> Self {
        let mask = RuleMask::from_levels(&levels);
        Self { levels, mask }
    }

    /// Rules that are not configured `off`.
    pub fn mask(&self) -> RuleMask {
        self.mask
    }

    /// Parse, extract and evaluate `documents`.
    ///
    /// Violations come back as parse errors (document order) followed by the
    /// output of each enabled rule in evaluation order.
    pub async fn analyze<P>(&self, documents: &[Document], parser: &P) -> RunResult
    where
        P: DocumentParser + ?Sized,
    {
        let total_start = Instant::now();

        let parse_start = Instant::now();
        let outcomes = join_all(documents.iter().map(|document| parser.parse(document))).await;
        let parse = parse_start.elapsed();

        let extract_start = Instant::now();
        let mut violations = Vec::new();
        let mut analyzed = Vec::with_capacity(documents.len());
        for (document, outcome) in documents.iter().zip(outcomes) {
            match outcome {
                Ok(content) => {
                    debug!(path = %document.path, tool = %document.tool, "parsed document");
                    analyzed.push(AnalyzedDocument::new(document.clone(), &content.value, self.mask));
                }
                Err(err) => {
                    warn!(path = %document.path, error = %err, "failed to parse document");
                    violations.push(Violation::new(
                        RuleId::ParseError,
                        Level::Error,
                        format!("Failed to parse file: {err}"),
                        &document.path,
                    ));
                }
            }
        }
        let extract = extract_start.elapsed();
        let failed = violations.len();

        let (rule_violations, rules) = self.evaluate_with_metrics(&analyzed);
        violations.extend(rule_violations);

        let total = total_start.elapsed();
        info!(
            documents = documents.len(),
            parsed = analyzed.len(),
            failed,
            violations = violations.len(),
            "analysis finished"
        );

        RunResult {
            violations,
            parsed: analyzed.len(),
            failed,
            metrics: RunMetrics { total, parse, extract, rules },
        }
    }

    /// Evaluate the enabled rules against already analyzed documents.
    ///
    /// The documents' facts should have been extracted with at least
    /// [`mask`](Self::mask); facts missing for an enabled rule are treated as
    /// absent.
    pub fn evaluate(&self, documents: &[AnalyzedDocument]) -> Vec<Violation> {
        self.evaluate_with_metrics(documents).0
    }

    fn evaluate_with_metrics(&self, documents: &[AnalyzedDocument]) -> (Vec<Violation>, Vec<RuleMetrics>) {
        let mut violations = Vec::new();
        let mut metrics = Vec::new();

        for active in active_rules(&self.levels) {
            let start = Instant::now();
            let produced = (active.rule.evaluate)(documents, active.level);
            let duration = start.elapsed();

            debug!(rule = %active.rule.id, level = %active.level, produced = produced.len(), "rule evaluated");
            metrics.push(RuleMetrics { rule: active.rule.id, duration, produced: produced.len() });
            violations.extend(produced);
        }

        (violations, metrics)
    }
}

impl Default for StaticEngine {
    fn default() -> Self {
        Self::new(RuleLevels::default())
    }
}
