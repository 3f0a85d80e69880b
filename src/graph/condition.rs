//! Path conditions: `{field, operator, value}` rows gating a branch.
//!
//! All conditions on a branch are AND-ed.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 4] = [
        ConditionOperator::Equals,
        ConditionOperator::NotEquals,
        ConditionOperator::GreaterThan,
        ConditionOperator::LessThan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Equals => "==",
            ConditionOperator::NotEquals => "!=",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::LessThan => "<",
        }
    }

    /// Compare numerically when both sides parse as finite numbers, otherwise
    /// by string. Ordering operators on non-numeric operands never hold.
    pub fn apply(self, left: &str, right: &str) -> bool {
        let numeric = finite(left).zip(finite(right));
        match (self, numeric) {
            (ConditionOperator::Equals, Some((l, r))) => l == r,
            (ConditionOperator::NotEquals, Some((l, r))) => l != r,
            (ConditionOperator::GreaterThan, Some((l, r))) => l > r,
            (ConditionOperator::LessThan, Some((l, r))) => l < r,
            (ConditionOperator::Equals, None) => left == right,
            (ConditionOperator::NotEquals, None) => left != right,
            (ConditionOperator::GreaterThan | ConditionOperator::LessThan, None) => false,
        }
    }
}

/// "NaN" and "inf" are words here, not numbers.
fn finite(operand: &str) -> Option<f64> {
    operand.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl FromStr for ConditionOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown condition operator '{}'", s))
    }
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Backend id; `None` for a condition that has not been saved yet.
    pub id: Option<String>,
    pub field: String,
    pub operator: ConditionOperator,
    pub value: String,
}

impl Condition {
    /// A missing variable makes the condition fail.
    pub fn holds(&self, variables: &HashMap<String, String>) -> bool {
        variables
            .get(&self.field)
            .is_some_and(|actual| self.operator.apply(actual, &self.value))
    }
}

/// True when every condition holds; an empty list always passes.
pub fn all_hold(conditions: &[Condition], variables: &HashMap<String, String>) -> bool {
    conditions.iter().all(|c| c.holds(variables))
}
