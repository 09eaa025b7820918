//! Detection engine.
//!
//! The engine turns a list of tagged documents into a flat list of
//! [`Violation`](crate::Violation)s. It is split into focused submodules under
//! `src/engine/`, while the checks themselves live under `src/rules/`.
//!
//! ## How the parts work together
//!
//! ```text
//! RuleLevels ── RuleMask::from_levels      (rule_set.rs)
//!                       │  which facts are worth extracting
//!                       v
//! documents ── DocumentParser::parse (all, awaited together)
//!                       │  failures -> `parse-error` violations
//!                       v
//!              DocumentFacts::extract      (facts.rs / extract.rs)
//!                - key paths, `${...}` tokens
//!                - `dependencies`, `{min, max}` ranges
//!                       │
//!                       v
//!              active rules, fixed order   (rules/*)
//!                duplicate-key -> undefined-ref
//!                -> priority-cycle -> range-conflict
//!                       │
//!                       v
//!                 Vec<Violation> + RunMetrics
//! ```
//!
//! Every run is independent: registries are built by the rules per call and
//! dropped afterwards, nothing is cached between runs.
//!
//! ## Responsibilities by module
//!
//! - `extract.rs`: pure shape-matching functions over [`NestedValue`](crate::NestedValue).
//! - `facts.rs`: extracts the facts of one document exactly once, gated by the
//!   active [`RuleMask`].
//! - `graph.rs`: the dependency graph and its cycle search.
//! - `rule_set.rs`: maps configured levels onto the active rule list.
//! - `runner.rs`: [`StaticEngine`], the parse -> extract -> evaluate pipeline.
//! - `metrics.rs`: per-phase and per-rule timing.
//!
//! ## Debugging
//!
//! Set `RULEFUSION_LOG=rulefusion=debug` (or `trace`) to follow parsing and
//! rule evaluation.

#[path = "engine/extract.rs"]
mod extract;
#[path = "engine/facts.rs"]
mod facts;
#[path = "engine/graph.rs"]
mod graph;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rule_set.rs"]
mod rule_set;
#[path = "engine/runner.rs"]
mod runner;

pub use extract::{
    NamedRange, extract_dependency_identifiers, extract_key_paths, extract_named_ranges, extract_references,
    ranges_overlap,
};
pub use facts::{AnalyzedDocument, DocumentFacts};
pub(crate) use graph::DependencyGraph;
pub use metrics::{RuleMetrics, RunMetrics, RunResult};
pub use rule_set::RuleMask;
pub use runner::StaticEngine;
