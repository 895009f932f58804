//! Reduces a group's expenses into one net balance per participant.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{SettlementConfig, DEFAULT_TOLERANCE};
use crate::error::SplitError;
use crate::model::{Expense, Participant, ParticipantId};

/// A participant's net position. Positive means they are owed money, negative means
/// they owe money.
///
/// `owes` and `owed_by` are running totals across every expense, keyed by the other
/// participant. They are gross amounts: Alice may both owe Bob and be owed by Bob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub balance: Decimal,
    pub owes: BTreeMap<ParticipantId, Decimal>,
    pub owed_by: BTreeMap<ParticipantId, Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    IsOwed,
    Owes,
    SettledUp,
}

impl Balance {
    fn new(participant: &Participant) -> Self {
        Balance {
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            balance: Decimal::ZERO,
            owes: BTreeMap::new(),
            owed_by: BTreeMap::new(),
        }
    }

    pub fn status(&self, config: &SettlementConfig) -> BalanceStatus {
        if config.is_settled(self.balance) {
            BalanceStatus::SettledUp
        } else if self.balance.is_sign_positive() {
            BalanceStatus::IsOwed
        } else {
            BalanceStatus::Owes
        }
    }
}

/// True when at least one balance is outside the tolerance.
pub fn has_outstanding_balances(balances: &[Balance], config: &SettlementConfig) -> bool {
    balances
        .iter()
        .any(|balance| !config.is_settled(balance.balance))
}

/// Computes every participant's balance, in the order the participants were given.
///
/// The payer of each expense is credited with the full amount and every split
/// participant is debited with their share. A split that does not add up to the
/// expense total is not rejected; the difference flows into the balances. Run
/// [`crate::validate_expenses`] first to catch those.
///
/// Fails when a participant id is repeated, when an expense references a participant
/// that is not in `participants`, or when a running total overflows `Decimal`.
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[Expense],
) -> Result<Vec<Balance>, SplitError> {
    let index = index_participants(participants)?;
    let mut balances: Vec<Balance> = participants.iter().map(Balance::new).collect();

    for expense in expenses {
        let payer = position(&index, &expense.paid_by, expense)?;
        let splits = expense
            .split_between
            .iter()
            .map(|split| position(&index, &split.participant_id, expense).map(|at| (at, split)))
            .collect::<Result<Vec<_>, _>>()?;

        balances[payer].balance = expense.add_amounts(balances[payer].balance, expense.amount)?;

        for (debtor, split) in splits {
            balances[debtor].balance = expense.sub_amounts(balances[debtor].balance, split.amount)?;
            if debtor == payer {
                continue;
            }
            let owes = balances[debtor]
                .owes
                .entry(expense.paid_by.clone())
                .or_insert(Decimal::ZERO);
            *owes = expense.add_amounts(*owes, split.amount)?;
            let owed_by = balances[payer]
                .owed_by
                .entry(split.participant_id.clone())
                .or_insert(Decimal::ZERO);
            *owed_by = expense.add_amounts(*owed_by, split.amount)?;
        }

        let mismatched = expense
            .split_total()
            .and_then(|total| expense.sub_amounts(total, expense.amount))
            .map_or(true, |difference| difference.abs() >= DEFAULT_TOLERANCE);
        if mismatched {
            warn!(
                expense = %expense.id,
                amount = %expense.amount,
                "expense splits do not add up to its amount"
            );
        }
    }

    debug!(
        participants = balances.len(),
        expenses = expenses.len(),
        "computed balances"
    );
    Ok(balances)
}

pub(crate) fn index_participants(
    participants: &[Participant],
) -> Result<HashMap<&ParticipantId, usize>, SplitError> {
    if let Some(duplicate) = participants.iter().map(|p| &p.id).duplicates().next() {
        return Err(SplitError::DuplicateParticipant(duplicate.clone()));
    }
    Ok(participants
        .iter()
        .enumerate()
        .map(|(at, participant)| (&participant.id, at))
        .collect())
}

pub(crate) fn position(
    index: &HashMap<&ParticipantId, usize>,
    id: &ParticipantId,
    expense: &Expense,
) -> Result<usize, SplitError> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| SplitError::UnknownParticipant {
            participant: id.clone(),
            expense: expense.id.clone(),
        })
}
