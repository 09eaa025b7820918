//! Active rule selection.
//!
//! Configured [`RuleLevels`] decide which rules run and at which level. The
//! selection is also summarized as a [`RuleMask`] so fact extraction can skip
//! work that no active rule will look at.
//!
//! | fact          | needed by                      |
//! |---------------|--------------------------------|
//! | key paths     | duplicate-key, undefined-ref   |
//! | references    | undefined-ref                  |
//! | dependencies  | priority-cycle                 |
//! | named ranges  | range-conflict                 |

use crate::rules::{RULES, Rule};
use crate::{Level, RuleId, RuleLevels};

bitflags::bitflags! {
    /// Set of enabled rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuleMask: u8 {
        const DUPLICATE_KEY  = 1 << 0;
        const UNDEFINED_REF  = 1 << 1;
        const PRIORITY_CYCLE = 1 << 2;
        const RANGE_CONFLICT = 1 << 3;
    }
}

impl RuleMask {
    /// Bit for a single rule. `parse-error` has no bit: it cannot be disabled.
    pub fn for_rule(rule: RuleId) -> Self {
        match rule {
            RuleId::DuplicateKey => RuleMask::DUPLICATE_KEY,
            RuleId::UndefinedRef => RuleMask::UNDEFINED_REF,
            RuleId::PriorityCycle => RuleMask::PRIORITY_CYCLE,
            RuleId::RangeConflict => RuleMask::RANGE_CONFLICT,
            RuleId::ParseError => RuleMask::empty(),
        }
    }

    /// Rules whose configured level is not `off`.
    pub fn from_levels(levels: &RuleLevels) -> Self {
        RuleId::CONFIGURABLE
            .into_iter()
            .filter(|rule| levels.level(*rule).as_level().is_some())
            .fold(RuleMask::empty(), |mask, rule| mask | RuleMask::for_rule(rule))
    }

    pub fn needs_key_paths(self) -> bool {
        self.intersects(RuleMask::DUPLICATE_KEY | RuleMask::UNDEFINED_REF)
    }

    pub fn needs_references(self) -> bool {
        self.contains(RuleMask::UNDEFINED_REF)
    }

    pub fn needs_dependencies(self) -> bool {
        self.contains(RuleMask::PRIORITY_CYCLE)
    }

    pub fn needs_ranges(self) -> bool {
        self.contains(RuleMask::RANGE_CONFLICT)
    }
}

/// A rule paired with the level its violations are reported at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveRule {
    pub rule: &'static Rule,
    pub level: Level,
}

/// Enabled rules in evaluation order.
pub(crate) fn active_rules(levels: &RuleLevels) -> Vec<ActiveRule> {
    RULES
        .iter()
        .filter_map(|rule| levels.level(rule.id).as_level().map(|level| ActiveRule { rule, level }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleLevel;

    fn levels(dup: RuleLevel, undef: RuleLevel, cycle: RuleLevel, range: RuleLevel) -> RuleLevels {
        RuleLevels { duplicate_key: dup, undefined_ref: undef, priority_cycle: cycle, range_conflict: range }
    }

    #[test]
    fn mask_follows_levels() {
        let l = levels(RuleLevel::Error, RuleLevel::Off, RuleLevel::Warning, RuleLevel::Off);
        let mask = RuleMask::from_levels(&l);

        assert_eq!(mask, RuleMask::DUPLICATE_KEY | RuleMask::PRIORITY_CYCLE);
        assert!(mask.needs_key_paths());
        assert!(!mask.needs_references());
        assert!(mask.needs_dependencies());
        assert!(!mask.needs_ranges());
    }

    #[test]
    fn undefined_ref_alone_still_needs_key_paths() {
        let l = levels(RuleLevel::Off, RuleLevel::Warning, RuleLevel::Off, RuleLevel::Off);
        let mask = RuleMask::from_levels(&l);
        assert!(mask.needs_key_paths());
        assert!(mask.needs_references());
    }

    #[test]
    fn active_rules_keep_evaluation_order() {
        let l = levels(RuleLevel::Warning, RuleLevel::Off, RuleLevel::Error, RuleLevel::Warning);
        let active: Vec<(RuleId, Level)> = active_rules(&l).iter().map(|a| (a.rule.id, a.level)).collect();

        assert_eq!(
            active,
            vec![
                (RuleId::DuplicateKey, Level::Warning),
                (RuleId::PriorityCycle, Level::Error),
                (RuleId::RangeConflict, Level::Warning),
            ]
        );
    }
}
