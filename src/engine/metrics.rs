//! Engine run metrics.
//!
//! Every [`StaticEngine::analyze`](super::StaticEngine::analyze) call records
//! how long each phase took and how many violations each rule produced. The
//! CLI prints these with `--verbose`; the plain [`check`](crate::check) API
//! only keeps the total.

use crate::{RuleId, Violation};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default, Clone, Serialize)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Time spent waiting on the parser for all documents.
    pub parse: Duration,
    /// Time spent extracting facts from parsed documents.
    pub extract: Duration,
    /// One entry per evaluated rule, in evaluation order. Disabled rules
    /// have no entry.
    pub rules: Vec<RuleMetrics>,
}

/// Timing and output size of a single rule evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RuleMetrics {
    pub rule: RuleId,
    pub duration: Duration,
    pub produced: usize,
}

/// Engine output bundled with counts and timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Parse errors first, then rule violations in evaluation order.
    pub violations: Vec<Violation>,
    /// Number of documents that parsed successfully.
    pub parsed: usize,
    /// Number of documents that failed to parse.
    pub failed: usize,
    pub metrics: RunMetrics,
}
