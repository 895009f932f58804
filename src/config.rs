use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One cent.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Tuning for the settlement planner and the balance status checks.
///
/// `tolerance` is the single threshold under which a balance counts as settled. It is
/// used for picking creditors and debtors, for moving past a settled participant and
/// for deciding whether anything is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    pub tolerance: Decimal,
}

impl SettlementConfig {
    /// Negative tolerances are treated as their magnitude.
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        SettlementConfig {
            tolerance: tolerance.abs(),
        }
    }

    pub(crate) fn is_settled(&self, amount: Decimal) -> bool {
        amount.abs() < self.tolerance || amount.is_zero()
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}
