//! Split shared expenses between a group and settle them with the fewest payments.
//!
//! Splitsolver works on a snapshot of a group: its participants and the expenses they
//! recorded. Each expense has a payer, a total, and a split saying how much of it
//! belongs to whom. From that, splitsolver gives you two things:
//!
//! * a [`Balance`] per participant, positive when they are owed money and negative
//!   when they owe money, along with who owes whom how much;
//! * a short list of [`Settlement`]s, the payments that bring every balance back to
//!   zero.
//!
//! # Use
//!
//! Expenses are split either by hand or equally with [`split_equally`]. If Alice
//! pays 100 for a dinner shared with Bob, you would record that as:
//!
//! ```
//! use rust_decimal_macros::dec;
//! use splitsolver::{split_equally, Expense, Participant};
//!
//! let alice = Participant::new("alice", "Alice");
//! let bob = Participant::new("bob", "Bob");
//! let split = split_equally(dec!(100), &[alice.id.clone(), bob.id.clone()]).unwrap();
//! let dinner = Expense::new("dinner", "Dinner", dec!(100), alice.id.clone(), split);
//! ```
//!
//! Balances are computed from scratch on every call, and settlements are planned from
//! the balances:
//!
//! ```
//! use rust_decimal_macros::dec;
//! use splitsolver::{compute_balances, plan_settlements, Expense, ExpenseSplit, Participant};
//!
//! let participants = vec![
//!     Participant::new("a", "Alice"),
//!     Participant::new("b", "Bob"),
//!     Participant::new("c", "Carol"),
//! ];
//!
//! // Alice paid 90 for a hotel room shared by all three,
//! // Bob paid 30 for breakfast for everyone.
//! let expenses = vec![
//!     Expense::new("e1", "Hotel", dec!(90), "a", vec![
//!         ExpenseSplit::new("a", dec!(30)),
//!         ExpenseSplit::new("b", dec!(30)),
//!         ExpenseSplit::new("c", dec!(30)),
//!     ]),
//!     Expense::new("e2", "Breakfast", dec!(30), "b", vec![
//!         ExpenseSplit::new("a", dec!(10)),
//!         ExpenseSplit::new("b", dec!(10)),
//!         ExpenseSplit::new("c", dec!(10)),
//!     ]),
//! ];
//!
//! let balances = compute_balances(&participants, &expenses).unwrap();
//! let settlements = plan_settlements(&balances);
//!
//! for settlement in &settlements {
//!     println!("{}", settlement);
//! }
//! // Carol pays Alice 40.00
//! // Bob pays Alice 10.00
//! assert_eq!(settlements.len(), 2);
//! ```

pub mod balance;
pub mod config;
pub mod error;
pub mod model;
pub mod settlement;
pub mod split;

pub use balance::{compute_balances, has_outstanding_balances, Balance, BalanceStatus};
pub use config::{SettlementConfig, DEFAULT_TOLERANCE};
pub use error::SplitError;
pub use model::{Expense, ExpenseId, ExpenseSplit, Group, Participant, ParticipantId};
pub use settlement::{plan_settlements, plan_settlements_with, Settlement};
pub use split::{split_equally, validate_expenses};
