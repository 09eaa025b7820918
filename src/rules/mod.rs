//! Consistency rules.
//!
//! Each rule is a plain function over the analyzed corpus. Rules are
//! independent: each builds its own registry per call and only reads the
//! shared [`DocumentFacts`](crate::DocumentFacts).
//!
//! New rules are added to [`RULES`]; their position there is their evaluation
//! (and therefore output) order.

mod duplicate_key;
mod priority_cycle;
mod range_conflict;
mod undefined_ref;


use crate::engine::AnalyzedDocument;
use crate::{Level, RuleId, Violation};

pub(crate) type Evaluate = fn(&[AnalyzedDocument], Level) -> Vec<Violation>;

/// A rule: its identifier and the function that evaluates it.
pub(crate) struct Rule {
    pub id: RuleId,
    pub evaluate: Evaluate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).field("evaluate", &"<function>").finish()
    }
}

/// All configurable rules, in evaluation order.
pub(crate) static RULES: [Rule; 4] = [
    Rule { id: RuleId::DuplicateKey, evaluate: duplicate_key::check },
    Rule { id: RuleId::UndefinedRef, evaluate: undefined_ref::check },
    Rule { id: RuleId::PriorityCycle, evaluate: priority_cycle::check },
    Rule { id: RuleId::RangeConflict, evaluate: range_conflict::check },
];
