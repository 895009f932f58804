//! Building and checking the way an expense is divided.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::balance::{index_participants, position};
use crate::config::SettlementConfig;
use crate::error::SplitError;
use crate::model::{Expense, ExpenseSplit, Participant, ParticipantId};

const CENT: Decimal = dec!(0.01);

/// Divides `amount` equally between `participants`.
///
/// Shares are whole cents. Cents that do not divide evenly go one each to the first
/// participants in the list, and anything finer than a cent goes to the first, so the
/// shares always add up to exactly `amount`.
pub fn split_equally(
    amount: Decimal,
    participants: &[ParticipantId],
) -> Result<Vec<ExpenseSplit>, SplitError> {
    if participants.is_empty() {
        return Err(SplitError::EmptySplit);
    }
    if amount <= Decimal::ZERO {
        return Err(SplitError::InvalidAmount(amount));
    }

    let count = Decimal::from(participants.len());
    let share = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut leftover = amount - share * count;

    let mut splits: Vec<ExpenseSplit> = participants
        .iter()
        .map(|id| ExpenseSplit::new(id.clone(), share))
        .collect();
    for split in splits.iter_mut() {
        if leftover < CENT {
            break;
        }
        split.amount += CENT;
        leftover -= CENT;
    }
    if let Some(first) = splits.first_mut() {
        first.amount += leftover;
    }

    Ok(splits)
}

impl Expense {
    /// Checks that the expense is split between someone and that the splits add up
    /// to the total within `config.tolerance`.
    pub fn validate(&self, config: &SettlementConfig) -> Result<(), SplitError> {
        if self.split_between.is_empty() {
            return Err(SplitError::EmptySplit);
        }
        let actual = self.split_total()?;
        let within_tolerance = actual == self.amount
            || self
                .sub_amounts(actual, self.amount)
                .map_or(false, |difference| difference.abs() < config.tolerance);
        if !within_tolerance {
            return Err(SplitError::SplitMismatch {
                expense: self.id.clone(),
                expected: self.amount,
                actual,
            });
        }
        Ok(())
    }
}

/// Full validation pass over a group's data, stopping at the first problem.
///
/// Reports the same referential errors as [`crate::compute_balances`] and, in
/// addition, every expense whose splits do not add up.
pub fn validate_expenses(
    participants: &[Participant],
    expenses: &[Expense],
    config: &SettlementConfig,
) -> Result<(), SplitError> {
    let index = index_participants(participants)?;
    for expense in expenses {
        position(&index, &expense.paid_by, expense)?;
        for split in &expense.split_between {
            position(&index, &split.participant_id, expense)?;
        }
        expense.validate(config)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|name| ParticipantId::new(*name)).collect()
    }

    fn shares(splits: &[ExpenseSplit]) -> Vec<Decimal> {
        splits.iter().map(|split| split.amount).collect()
    }

    #[rstest]
    #[case::even(dec!(100), 2, vec![dec!(50), dec!(50)])]
    #[case::thirds(dec!(100), 3, vec![dec!(33.34), dec!(33.33), dec!(33.33)])]
    #[case::two_leftover_cents(dec!(0.05), 3, vec![dec!(0.02), dec!(0.02), dec!(0.01)])]
    #[case::sub_cent_total(dec!(10.005), 2, vec![dec!(5.005), dec!(5.00)])]
    #[case::single(dec!(12.34), 1, vec![dec!(12.34)])]
    fn splits_equally_to_the_cent(
        #[case] amount: Decimal,
        #[case] count: usize,
        #[case] expected: Vec<Decimal>,
    ) {
        let names = ["a", "b", "c", "d"];
        let splits = split_equally(amount, &ids(&names[..count])).unwrap();

        assert_eq!(shares(&splits), expected);
        assert_eq!(splits.iter().map(|s| s.amount).sum::<Decimal>(), amount);
    }

    #[test]
    fn keeps_participant_order() {
        let splits = split_equally(dec!(9), &ids(&["c", "a", "b"])).unwrap();
        let order: Vec<&str> = splits.iter().map(|s| s.participant_id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn cannot_split_between_nobody() {
        assert_eq!(split_equally(dec!(10), &[]), Err(SplitError::EmptySplit));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-4))]
    fn cannot_split_non_positive_amounts(#[case] amount: Decimal) {
        assert_eq!(
            split_equally(amount, &ids(&["a"])),
            Err(SplitError::InvalidAmount(amount))
        );
    }

    fn expense(amount: Decimal, splits: &[(&str, Decimal)]) -> Expense {
        Expense::new(
            "e1",
            "Groceries",
            amount,
            "a",
            splits
                .iter()
                .map(|(who, share)| ExpenseSplit::new(*who, *share))
                .collect(),
        )
    }

    #[rstest]
    #[case::exact(dec!(100), &[("a", dec!(70)), ("b", dec!(30))])]
    #[case::within_a_cent(dec!(100), &[("a", dec!(33.333)), ("b", dec!(33.333)), ("c", dec!(33.333))])]
    fn accepts_consistent_splits(#[case] amount: Decimal, #[case] splits: &[(&str, Decimal)]) {
        assert_eq!(expense(amount, splits).validate(&SettlementConfig::default()), Ok(()));
    }

    #[test]
    fn reports_split_mismatch() {
        let expense = expense(dec!(100), &[("a", dec!(70)), ("b", dec!(20))]);

        assert_eq!(
            expense.validate(&SettlementConfig::default()),
            Err(SplitError::SplitMismatch {
                expense: "e1".into(),
                expected: dec!(100),
                actual: dec!(90),
            })
        );
    }

    #[test]
    fn reports_overflowing_split_sum() {
        let expense = expense(dec!(1), &[("a", Decimal::MAX), ("b", Decimal::MAX)]);
        assert_eq!(
            expense.validate(&SettlementConfig::default()),
            Err(SplitError::AmountOverflow {
                expense: "e1".into()
            })
        );
    }

    #[test]
    fn reports_empty_split() {
        let expense = expense(dec!(100), &[]);
        assert_eq!(
            expense.validate(&SettlementConfig::default()),
            Err(SplitError::EmptySplit)
        );
    }

    #[test]
    fn validates_references_before_sums() {
        let participants = vec![Participant::new("a", "Alice"), Participant::new("b", "Bob")];
        let config = SettlementConfig::default();

        let dangling = expense(dec!(10), &[("x", dec!(3))]);
        assert_eq!(
            validate_expenses(&participants, &[dangling], &config),
            Err(SplitError::UnknownParticipant {
                participant: "x".into(),
                expense: "e1".into(),
            })
        );

        let fine = expense(dec!(10), &[("a", dec!(5)), ("b", dec!(5))]);
        assert_eq!(validate_expenses(&participants, &[fine], &config), Ok(()));
    }
}
