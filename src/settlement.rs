//! Turns balances into the payments that clear them.

use std::fmt;

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::balance::Balance;
use crate::config::SettlementConfig;
use crate::error::SplitError;
use crate::model::{Participant, ParticipantId};

/// A payment where one participant (`from`) pays another (`to`) the amount specified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: ParticipantId,
    pub from_name: String,
    pub to: ParticipantId,
    pub to_name: String,
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(from: &Participant, to: &Participant, amount: Decimal) -> Result<Self, SplitError> {
        Settlement::build(&from.id, &from.name, &to.id, &to.name, amount)
    }

    fn between(debtor: &Balance, creditor: &Balance, amount: Decimal) -> Result<Self, SplitError> {
        Settlement::build(
            &debtor.participant_id,
            &debtor.participant_name,
            &creditor.participant_id,
            &creditor.participant_name,
            amount,
        )
    }

    fn build(
        from: &ParticipantId,
        from_name: &str,
        to: &ParticipantId,
        to_name: &str,
        amount: Decimal,
    ) -> Result<Self, SplitError> {
        if amount <= Decimal::ZERO {
            return Err(SplitError::InvalidAmount(amount));
        }
        Ok(Settlement {
            from: from.clone(),
            from_name: from_name.to_string(),
            to: to.clone(),
            to_name: to_name.to_string(),
            amount,
        })
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {:.2}", self.from_name, self.to_name, self.amount)
    }
}

struct Position<'a> {
    balance: &'a Balance,
    remaining: Decimal,
}

impl Position<'_> {
    fn is_creditor(&self, config: &SettlementConfig) -> bool {
        self.remaining > Decimal::ZERO && !config.is_settled(self.remaining)
    }

    fn is_debtor(&self, config: &SettlementConfig) -> bool {
        self.remaining < Decimal::ZERO && !config.is_settled(self.remaining)
    }
}

// Moves a settled position's residue onto the next position inside the window so the
// window keeps summing to the same total. Larger amounts are left where they are.
fn fold_residue(positions: &mut [Position], from: usize, into: usize, config: &SettlementConfig) {
    let residue = positions[from].remaining;
    if residue.is_zero() || !config.is_settled(residue) {
        return;
    }
    positions[from].remaining = Decimal::ZERO;
    positions[into].remaining = positions[into].remaining.saturating_add(residue);
}

/// Plans settlements with the default one-cent tolerance.
pub fn plan_settlements(balances: &[Balance]) -> Vec<Settlement> {
    plan_settlements_with(balances, &SettlementConfig::default())
}

/// Returns the payments that bring every balance back to zero.
///
/// Creditors are matched with debtors greedily: the largest remaining creditor is
/// paid by the largest remaining debtor, as much as either can take, until the two
/// meet. For `n` participants with a non-zero balance this never needs more than
/// `n - 1` payments, and often fewer.
///
/// A balance within `config.tolerance` of zero is not paid on its own. It is folded
/// into its neighbour in the sorted order instead, so small residues add up and are
/// paid once they pass the tolerance, and every participant ends within the
/// tolerance of zero. `balances` itself is left untouched.
pub fn plan_settlements_with(balances: &[Balance], config: &SettlementConfig) -> Vec<Settlement> {
    let mut settlements: Vec<Settlement> = Vec::new();
    let mut positions: Vec<Position> = balances
        .iter()
        .map(|balance| Position {
            balance,
            remaining: balance.balance,
        })
        .sorted_by(|a, b| b.remaining.cmp(&a.remaining))
        .collect();

    if positions.len() < 2 {
        return settlements;
    }

    let mut hi = 0;
    let mut lo = positions.len() - 1;

    while hi < lo {
        if !positions[hi].is_creditor(config) {
            fold_residue(&mut positions, hi, hi + 1, config);
            hi += 1;
            continue;
        }
        if !positions[lo].is_debtor(config) {
            fold_residue(&mut positions, lo, lo - 1, config);
            lo -= 1;
            continue;
        }

        let amount = positions[hi].remaining.min(positions[lo].remaining.abs());
        positions[hi].remaining -= amount;
        positions[lo].remaining += amount;

        let creditor = positions[hi].balance;
        let debtor = positions[lo].balance;
        match Settlement::between(debtor, creditor, amount) {
            Ok(settlement) => {
                debug!(
                    from = %settlement.from,
                    to = %settlement.to,
                    amount = %settlement.amount,
                    "planned settlement"
                );
                settlements.push(settlement);
            }
            Err(err) => warn!(%err, "skipped settlement"),
        }

        if config.is_settled(positions[hi].remaining) {
            fold_residue(&mut positions, hi, hi + 1, config);
            hi += 1;
        }
        if hi < lo && config.is_settled(positions[lo].remaining) {
            fold_residue(&mut positions, lo, lo - 1, config);
            lo -= 1;
        }
    }

    settlements
}
