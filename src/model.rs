//! Group data handed to the calculator by the surrounding application.
//!
//! Nothing here is mutated by the calculator. A [`Group`] is a read-only snapshot of
//! participants and expenses; derived values live in [`crate::balance`] and
//! [`crate::settlement`].

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::{compute_balances, Balance};
use crate::config::SettlementConfig;
use crate::error::SplitError;
use crate::settlement::{plan_settlements_with, Settlement};

/// Opaque participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId::new(id)
    }
}

/// Opaque expense identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        ExpenseId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(id: &str) -> Self {
        ExpenseId::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One participant's share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub participant_id: ParticipantId,
    pub amount: Decimal,
}

impl ExpenseSplit {
    pub fn new(participant_id: impl Into<ParticipantId>, amount: Decimal) -> Self {
        ExpenseSplit {
            participant_id: participant_id.into(),
            amount,
        }
    }
}

/// A shared expense paid by one participant and split between several.
///
/// The splits are expected to add up to `amount`, but nothing upstream enforces it.
/// Use [`Expense::validate`] to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Decimal,
    pub paid_by: ParticipantId,
    pub split_between: Vec<ExpenseSplit>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        id: impl Into<ExpenseId>,
        description: impl Into<String>,
        amount: Decimal,
        paid_by: impl Into<ParticipantId>,
        split_between: Vec<ExpenseSplit>,
    ) -> Self {
        Expense {
            id: id.into(),
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between,
            created_at: Utc::now(),
        }
    }

    /// Sum of all split amounts.
    pub fn split_total(&self) -> Result<Decimal, SplitError> {
        self.split_between
            .iter()
            .try_fold(Decimal::ZERO, |acc, split| self.add_amounts(acc, split.amount))
    }

    pub(crate) fn add_amounts(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal, SplitError> {
        lhs.checked_add(rhs)
            .ok_or_else(|| SplitError::AmountOverflow {
                expense: self.id.clone(),
            })
    }

    pub(crate) fn sub_amounts(&self, lhs: Decimal, rhs: Decimal) -> Result<Decimal, SplitError> {
        lhs.checked_sub(rhs)
            .ok_or_else(|| SplitError::AmountOverflow {
                expense: self.id.clone(),
            })
    }
}

/// Read-only snapshot of a group as stored by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn balances(&self) -> Result<Vec<Balance>, SplitError> {
        compute_balances(&self.participants, &self.expenses)
    }

    pub fn settlements(&self, config: &SettlementConfig) -> Result<Vec<Settlement>, SplitError> {
        Ok(plan_settlements_with(&self.balances()?, config))
    }

    /// Total spent by the group across all expenses.
    pub fn total_expenses(&self) -> Result<Decimal, SplitError> {
        self.expenses
            .iter()
            .try_fold(Decimal::ZERO, |total, expense| expense.add_amounts(total, expense.amount))
    }

    /// Case-insensitive lookup, matching how the application keeps names unique.
    pub fn find_participant_by_name(&self, name: &str) -> Option<&Participant> {
        let wanted = name.trim().to_lowercase();
        self.participants
            .iter()
            .find(|participant| participant.name.to_lowercase() == wanted)
    }

    /// A participant referenced by any expense, as payer or in a split, cannot be removed.
    pub fn is_participant_referenced(&self, id: &ParticipantId) -> bool {
        self.expenses.iter().any(|expense| {
            expense.paid_by == *id
                || expense
                    .split_between
                    .iter()
                    .any(|split| split.participant_id == *id)
        })
    }
}
