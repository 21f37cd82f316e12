//! Random expense group generation.
//!
//! Produces synthetic groups for benchmarks, property checks and the
//! `generate` CLI command.

use crate::core::error::SettlementError;
use crate::core::expense::Expense;
use crate::core::group::ExpenseGroup;
use crate::core::participant::ParticipantId;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random expense group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of participants in the group.
    pub participant_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Smallest expense amount, in cents.
    pub min_cents: u64,
    /// Largest expense amount, in cents (exclusive).
    pub max_cents: u64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 5,
            expense_count: 20,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

impl GroupConfig {
    /// Reject configurations that cannot produce a group.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.participant_count == 0 {
            return Err(SettlementError::invalid_input(
                "participant_count must be at least 1",
            ));
        }
        if self.min_cents >= self.max_cents {
            return Err(SettlementError::invalid_input(format!(
                "empty amount range {}..{} cents",
                self.min_cents, self.max_cents
            )));
        }
        if i64::try_from(self.max_cents).is_err() {
            return Err(SettlementError::invalid_input(format!(
                "max_cents {} is too large",
                self.max_cents
            )));
        }
        Ok(())
    }
}

/// Generate a random group with `config.expense_count` expenses.
///
/// Participants are named `P-000`, `P-001`, ... and payers are picked
/// uniformly. Amounts are whole cents in `min_cents..max_cents`.
pub fn generate_random_group(config: &GroupConfig) -> Result<ExpenseGroup, SettlementError> {
    config.validate()?;
    let mut rng = rand::thread_rng();

    let participants: Vec<ParticipantId> = (0..config.participant_count)
        .map(|i| ParticipantId::new(format!("P-{:03}", i)))
        .collect();

    let mut group = ExpenseGroup::new("generated", participants.clone())?;

    for i in 0..config.expense_count {
        let payer = participants[rng.gen_range(0..participants.len())].clone();
        let cents = i64::try_from(rng.gen_range(config.min_cents..config.max_cents))
            .map_err(|_| SettlementError::invalid_input("amount out of range"))?;
        let expense = Expense::new(payer, Decimal::new(cents, 2))
            .with_description(format!("expense #{}", i + 1));
        group.add_expense(expense)?;
    }

    Ok(group)
}
