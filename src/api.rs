use crate::engine::{RuleMetrics, StaticEngine};
use crate::parse::DocumentParser;
use crate::{Document, Level, RuleLevels, Violation};
use serde::Serialize;
use std::time::Duration;

/// Options that affect which rules run and at which level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub rules: RuleLevels,
}

/// Result from [`check`] and [`check_with`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Parse errors first, then rule violations in evaluation order.
    pub violations: Vec<Violation>,
    /// Number of documents handed to the engine, parsed or not.
    pub files_analyzed: usize,
    pub has_errors: bool,
    pub has_warnings: bool,
    /// Total time spent parsing and checking.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl AnalysisResult {
    fn new(violations: Vec<Violation>, files_analyzed: usize, elapsed: Duration) -> Self {
        let has_errors = violations.iter().any(|v| v.level == Level::Error);
        let has_warnings = violations.iter().any(|v| v.level == Level::Warning);
        Self { violations, files_analyzed, has_errors, has_warnings, elapsed }
    }

    /// Process exit status for this result: 1 when any violation is an error.
    pub fn exit_code(&self) -> u8 {
        if self.has_errors { 1 } else { 0 }
    }
}

/// Additional details returned by [`check_verbose_with`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisDetails {
    pub total: Duration,
    /// Time spent waiting on the parser.
    pub parse: Duration,
    /// Time spent extracting facts.
    pub extract: Duration,
    /// Per-rule timing and violation counts, in evaluation order.
    pub rules: Vec<RuleMetrics>,
    pub parsed: usize,
    pub failed: usize,
}

/// Result from [`check_verbose_with`].
#[derive(Debug, Clone)]
pub struct AnalysisResultVerbose {
    pub result: AnalysisResult,
    pub details: AnalysisDetails,
}

/// Check `documents` with the default rule levels.
pub async fn check<P>(documents: &[Document], parser: &P) -> AnalysisResult
where
    P: DocumentParser + ?Sized,
{
    check_with(documents, parser, &Options::default()).await
}

/// Check `documents` with the rule levels in `options`.
pub async fn check_with<P>(documents: &[Document], parser: &P, options: &Options) -> AnalysisResult
where
    P: DocumentParser + ?Sized,
{
    check_verbose_with(documents, parser, options).await.result
}

/// Check `documents` and keep per-phase and per-rule details.
pub async fn check_verbose_with<P>(documents: &[Document], parser: &P, options: &Options) -> AnalysisResultVerbose
where
    P: DocumentParser + ?Sized,
{
    let engine = StaticEngine::new(options.rules);
    let run = engine.analyze(documents, parser).await;

    let details = AnalysisDetails {
        total: run.metrics.total,
        parse: run.metrics.parse,
        extract: run.metrics.extract,
        rules: run.metrics.rules,
        parsed: run.parsed,
        failed: run.failed,
    };

    AnalysisResultVerbose { result: AnalysisResult::new(run.violations, documents.len(), details.total), details }
}
