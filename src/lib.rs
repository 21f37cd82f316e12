//! # splitwise-engine
//!
//! Group expense sharing and debt settlement engine.
//!
//! Given who paid what inside a group, this engine splits the total
//! equally and computes the directed transfers that bring every
//! participant back to zero.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: participants, expenses, groups, balances
//! - **engine**: The greedy settlement sweep and its verification
//! - **book**: In-memory settlement records with pending/completed lifecycle
//! - **simulation**: Random group generation for testing and benchmarks

pub mod book;
pub mod core;
pub mod engine;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::book::record::{SettlementRecord, SettlementStatus};
    pub use crate::book::settlement_book::{BookError, SettlementBook};
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::error::SettlementError;
    pub use crate::core::expense::Expense;
    pub use crate::core::group::ExpenseGroup;
    pub use crate::core::participant::ParticipantId;
    pub use crate::engine::settlement::{compute_settlements, Settlement, SettlementEngine, SettlementPlan};
    pub use crate::engine::verification::SettlementCheck;
}
