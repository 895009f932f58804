use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{ExpenseId, ParticipantId};

/// Errors surfaced by the balance calculator, the split helpers and the settlement types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// An expense names a payer or split participant that is not part of the group.
    #[error("expense {expense} references unknown participant {participant}")]
    UnknownParticipant {
        participant: ParticipantId,
        expense: ExpenseId,
    },

    /// The same participant id was supplied twice.
    #[error("participant {0} appears more than once")]
    DuplicateParticipant(ParticipantId),

    /// The split amounts of an expense do not add up to its total.
    #[error("expense {expense} splits {actual} but totals {expected}")]
    SplitMismatch {
        expense: ExpenseId,
        expected: Decimal,
        actual: Decimal,
    },

    /// An expense or an equal split was requested with nobody to split between.
    #[error("cannot split an amount between zero participants")]
    EmptySplit,

    /// A running total went past the largest amount a `Decimal` can hold.
    #[error("amounts in expense {expense} are too large to add up")]
    AmountOverflow { expense: ExpenseId },

    #[error("amount {0} is less than or equal to 0")]
    InvalidAmount(Decimal),
}
