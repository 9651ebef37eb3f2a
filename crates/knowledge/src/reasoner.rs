//! Rule inference over the fact base.
//!
//! The default rule set mirrors the bookstore's declarative rules:
//!
//! ```text
//! ConfirmPurchase:   Customer(c) ^ Purchases(c, b)                        -> HasPurchased(c, b)
//! LowStockFlag:      Inventory(i) ^ AvailableQuantity(i, q) ^ LowThreshold(i, t) ^ q <  t -> NeedsRestock(i, true)
//! ClearLowStockFlag: Inventory(i) ^ AvailableQuantity(i, q) ^ LowThreshold(i, t) ^ q >= t -> NeedsRestock(i, false)
//! ```
//!
//! Rules are applied round by round until no rule derives anything new.

use serde::Serialize;
use thiserror::Error;

use crate::facts::FactBase;
use crate::schema::{EntityKind, FactValue, vocab};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReasonerError {
    /// The reasoning backend cannot be reached or was never installed.
    #[error("reasoner unavailable: {0}")]
    Unavailable(String),

    /// Rules kept deriving new facts past the round limit.
    #[error("inference did not reach a fixpoint after {rounds} rounds")]
    NoFixpoint { rounds: usize },

    #[error("inference failed: {0}")]
    Failed(String),
}

/// Outcome of one successful inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    /// Rounds executed, including the final round that derived nothing.
    pub rounds: usize,
    /// Facts added or changed.
    pub derived: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Comparison {
    Less,
    GreaterOrEqual,
}

impl Comparison {
    fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
        }
    }
}

/// A declared inference rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `class(x) ^ value(x, v) ^ threshold(x, t) ^ compare(v, t) -> flag(x, set_to)`
    ThresholdFlag {
        name: String,
        class: EntityKind,
        value: String,
        threshold: String,
        compare: Comparison,
        flag: String,
        set_to: bool,
    },
    /// `class(x) ^ from(x, y) -> to(x, y)`
    Implies {
        name: String,
        class: EntityKind,
        from: String,
        to: String,
    },
}

impl Rule {
    pub fn name(&self) -> &str {
        match self {
            Rule::ThresholdFlag { name, .. } | Rule::Implies { name, .. } => name,
        }
    }

    /// Apply once; returns the number of facts added or changed.
    pub fn apply(&self, facts: &mut FactBase) -> usize {
        match self {
            Rule::ThresholdFlag {
                class,
                value,
                threshold,
                compare,
                flag,
                set_to,
                ..
            } => {
                let matches: Vec<_> = facts
                    .of_kind(*class)
                    .filter(|r| {
                        let v = r.attributes.get(value).and_then(FactValue::as_int);
                        let t = r.attributes.get(threshold).and_then(FactValue::as_int);
                        matches!((v, t), (Some(v), Some(t)) if compare.holds(v, t))
                    })
                    .map(|r| r.entity_ref())
                    .collect();
                matches
                    .iter()
                    .filter(|e| facts.set_attribute(e, flag, FactValue::Bool(*set_to)))
                    .count()
            }
            Rule::Implies { class, from, to, .. } => {
                let edges: Vec<_> = facts
                    .of_kind(*class)
                    .flat_map(|r| {
                        let subject = r.entity_ref();
                        r.relations
                            .get(from)
                            .into_iter()
                            .flatten()
                            .map(move |object| (subject.clone(), object.clone()))
                    })
                    .collect();
                edges
                    .iter()
                    .filter(|(s, o)| facts.add_relation(s, to, o))
                    .count()
            }
        }
    }
}

/// Inference backend.
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;

    /// Materialise rule consequences into `facts`.
    ///
    /// On error `facts` must be left exactly as it was.
    fn infer(&self, facts: &mut FactBase) -> Result<InferenceReport, ReasonerError>;
}

/// Forward-chaining evaluator over a fixed rule list.
#[derive(Debug, Clone)]
pub struct RuleReasoner {
    rules: Vec<Rule>,
    max_rounds: usize,
}

impl RuleReasoner {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            max_rounds: 32,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Purchase confirmation plus the two low-stock rules.
    pub fn default_rules() -> Vec<Rule> {
        vec![
            Rule::Implies {
                name: "ConfirmPurchase".to_string(),
                class: EntityKind::Customer,
                from: vocab::PURCHASES.to_string(),
                to: vocab::HAS_PURCHASED.to_string(),
            },
            Rule::ThresholdFlag {
                name: "LowStockFlag".to_string(),
                class: EntityKind::Inventory,
                value: vocab::AVAILABLE_QUANTITY.to_string(),
                threshold: vocab::LOW_THRESHOLD.to_string(),
                compare: Comparison::Less,
                flag: vocab::NEEDS_RESTOCK.to_string(),
                set_to: true,
            },
            Rule::ThresholdFlag {
                name: "ClearLowStockFlag".to_string(),
                class: EntityKind::Inventory,
                value: vocab::AVAILABLE_QUANTITY.to_string(),
                threshold: vocab::LOW_THRESHOLD.to_string(),
                compare: Comparison::GreaterOrEqual,
                flag: vocab::NEEDS_RESTOCK.to_string(),
                set_to: false,
            },
        ]
    }
}

impl Default for RuleReasoner {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

impl Reasoner for RuleReasoner {
    fn name(&self) -> &str {
        "rules"
    }

    fn infer(&self, facts: &mut FactBase) -> Result<InferenceReport, ReasonerError> {
        // Work on a copy so a failed run leaves the caller's facts untouched.
        let mut working = facts.clone();
        let mut report = InferenceReport::default();

        loop {
            if report.rounds >= self.max_rounds {
                return Err(ReasonerError::NoFixpoint { rounds: report.rounds });
            }
            report.rounds += 1;
            let derived: usize = self.rules.iter().map(|rule| rule.apply(&mut working)).sum();
            if derived == 0 {
                break;
            }
            report.derived += derived;
        }

        *facts = working;
        Ok(report)
    }
}

/// Reasoner stand-in that always fails, for deployments without an inference backend.
#[derive(Debug, Clone)]
pub struct UnavailableReasoner {
    reason: String,
}

impl UnavailableReasoner {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl Default for UnavailableReasoner {
    fn default() -> Self {
        Self::new("no inference backend installed")
    }
}

impl Reasoner for UnavailableReasoner {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn infer(&self, _facts: &mut FactBase) -> Result<InferenceReport, ReasonerError> {
        Err(ReasonerError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityRef;

    fn inventory(facts: &mut FactBase, name: &str, qty: i64, threshold: i64) -> EntityRef {
        let inv = EntityRef::new(EntityKind::Inventory, name);
        facts.set_attribute(&inv, vocab::AVAILABLE_QUANTITY, FactValue::Int(qty));
        facts.set_attribute(&inv, vocab::LOW_THRESHOLD, FactValue::Int(threshold));
        inv
    }

    #[test]
    fn low_stock_rules_set_and_clear_flag() {
        let mut facts = FactBase::new();
        let low = inventory(&mut facts, "inv_a", 2, 5);
        let ok = inventory(&mut facts, "inv_b", 5, 5);
        facts.set_attribute(&ok, vocab::NEEDS_RESTOCK, FactValue::Bool(true));

        let report = RuleReasoner::default().infer(&mut facts).unwrap();
        assert_eq!(report.derived, 2);
        assert_eq!(facts.attribute(&low, vocab::NEEDS_RESTOCK), Some(&FactValue::Bool(true)));
        assert_eq!(facts.attribute(&ok, vocab::NEEDS_RESTOCK), Some(&FactValue::Bool(false)));
    }

    #[test]
    fn rows_missing_a_threshold_are_not_flagged() {
        let mut facts = FactBase::new();
        let inv = EntityRef::new(EntityKind::Inventory, "inv_a");
        facts.set_attribute(&inv, vocab::AVAILABLE_QUANTITY, FactValue::Int(0));

        RuleReasoner::default().infer(&mut facts).unwrap();
        assert_eq!(facts.attribute(&inv, vocab::NEEDS_RESTOCK), None);
    }

    #[test]
    fn confirm_purchase_copies_relation() {
        let mut facts = FactBase::new();
        let c = EntityRef::new(EntityKind::Customer, "customer_0");
        let b = EntityRef::new(EntityKind::Book, "A");
        facts.add_relation(&c, vocab::PURCHASES, &b);

        RuleReasoner::default().infer(&mut facts).unwrap();
        assert_eq!(facts.related(&c, vocab::HAS_PURCHASED), &[b]);
    }

    #[test]
    fn second_run_derives_nothing() {
        let mut facts = FactBase::new();
        inventory(&mut facts, "inv_a", 0, 5);
        let reasoner = RuleReasoner::default();
        reasoner.infer(&mut facts).unwrap();

        let report = reasoner.infer(&mut facts).unwrap();
        assert_eq!(report, InferenceReport { rounds: 1, derived: 0 });
    }

    #[test]
    fn oscillating_rules_hit_round_limit_and_leave_facts_untouched() {
        // Two rules that keep flipping the same flag never settle.
        let flip = |set_to| Rule::ThresholdFlag {
            name: format!("flip_{set_to}"),
            class: EntityKind::Inventory,
            value: vocab::AVAILABLE_QUANTITY.to_string(),
            threshold: vocab::LOW_THRESHOLD.to_string(),
            compare: Comparison::Less,
            flag: vocab::NEEDS_RESTOCK.to_string(),
            set_to,
        };
        let reasoner = RuleReasoner::new(vec![flip(true), flip(false)]).with_max_rounds(4);

        let mut facts = FactBase::new();
        let inv = inventory(&mut facts, "inv_a", 0, 5);

        let err = reasoner.infer(&mut facts).unwrap_err();
        assert_eq!(err, ReasonerError::NoFixpoint { rounds: 4 });
        assert_eq!(facts.attribute(&inv, vocab::NEEDS_RESTOCK), None);
    }

    #[test]
    fn unavailable_reasoner_always_fails() {
        let mut facts = FactBase::new();
        let err = UnavailableReasoner::default().infer(&mut facts).unwrap_err();
        assert!(matches!(err, ReasonerError::Unavailable(_)));
    }
}
