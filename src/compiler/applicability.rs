//! Rule applicability.
//!
//! Each device (a gate's transcription unit, or the top-level circuit) gets
//! the subset of the user's rules that only mention its own members. Rules
//! are taken in pool order, and a rule is accepted when:
//!
//! - every name it references (see `tokenize.rs`) is a member of the device;
//! - it does not add a second `STARTSWITH` to the device. Roadblocking is
//!   expressed with `STARTSWITH`, and two of them on one device make the
//!   engine reject the whole program.
//!
//! A conflicting rule is dropped and reported, never merged.

use super::tokenize::{is_starts_with, referenced_names};
use tracing::{debug, warn};

/// Joins accepted rules inside a rule block.
pub(crate) const CLAUSE_SEPARATOR: &str = " AND\n   ";

/// A rule left out of a device because it conflicts with one already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRule {
    pub device: String,
    pub rule: String,
}

/// Rules accepted for one device, plus the ones dropped as conflicting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSelection {
    pub accepted: Vec<String>,
    pub dropped: Vec<DroppedRule>,
}

impl RuleSelection {
    /// Accepted rules as one conjunctive clause, or `""` if there are none.
    pub fn clause(&self) -> String {
        self.accepted.join(CLAUSE_SEPARATOR)
    }

    fn has_starts_with(&self) -> bool {
        self.accepted.iter().any(|rule| is_starts_with(rule))
    }
}

/// Pick the rules from `pool` that apply to `device`, whose members are
/// `members`.
pub fn select_rules<S: AsRef<str>>(device: &str, members: &[S], pool: &[String]) -> RuleSelection {
    let mut selection = RuleSelection::default();

    for rule in pool {
        let applicable = referenced_names(rule).iter().all(|name| members.iter().any(|m| m.as_ref() == *name));
        if !applicable {
            continue;
        }

        if is_starts_with(rule) && selection.has_starts_with() {
            warn!(device, rule = %rule, "more than one STARTSWITH rule for device, omitting rule");
            selection.dropped.push(DroppedRule { device: device.to_string(), rule: rule.clone() });
            continue;
        }

        debug!(device, rule = %rule, "rule applies");
        selection.accepted.push(rule.clone());
    }

    selection
}
