use crate::core::balance::BalanceSheet;
use crate::core::error::SettlementError;
use crate::core::expense::{validate_amount, Expense};
use crate::core::participant::ParticipantId;
use crate::engine::settlement::{Settlement, SettlementEngine, SettlementPlan};
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of participants and the expenses they share.
///
/// Every way of building or changing a group (including deserializing
/// one) runs the same checks, so a group that exists can always be
/// handed to the settlement engine as-is.
///
/// # Examples
///
/// ```
/// use splitwise_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut trip = ExpenseGroup::new(
///     "Lisbon",
///     vec![ParticipantId::new("ana"), ParticipantId::new("ben")],
/// ).unwrap();
/// trip.add_expense(Expense::new(ParticipantId::new("ana"), dec!(80))).unwrap();
///
/// let transfers = trip.settlements().unwrap();
/// assert_eq!(transfers[0].amount, dec!(40));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGroup")]
pub struct ExpenseGroup {
    id: Uuid,
    name: String,
    participants: Vec<ParticipantId>,
    expenses: Vec<Expense>,
    created_at: DateTime<Utc>,
}

/// Unchecked wire shape of [`ExpenseGroup`].
#[derive(Deserialize)]
struct RawGroup {
    id: Uuid,
    name: String,
    participants: Vec<ParticipantId>,
    #[serde(default)]
    expenses: Vec<Expense>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawGroup> for ExpenseGroup {
    type Error = SettlementError;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        let mut group = Self::new(raw.name, raw.participants)?;
        group.id = raw.id;
        group.created_at = raw.created_at;
        for expense in raw.expenses {
            group.add_expense(expense)?;
        }
        Ok(group)
    }
}

fn check_name(name: &str) -> Result<(), SettlementError> {
    if name.trim().is_empty() {
        return Err(SettlementError::invalid_input("group name must not be empty"));
    }
    Ok(())
}

fn check_participants(participants: &[ParticipantId]) -> Result<(), SettlementError> {
    if participants.is_empty() {
        return Err(SettlementError::invalid_input(
            "a group needs at least one participant",
        ));
    }
    for (i, participant) in participants.iter().enumerate() {
        if participants[..i].contains(participant) {
            return Err(SettlementError::DuplicateParticipant {
                participant: participant.clone(),
            });
        }
    }
    Ok(())
}

impl ExpenseGroup {
    /// Create an empty group.
    ///
    /// Requires a non-blank name, at least one participant, and no
    /// repeated participants.
    pub fn new(
        name: impl Into<String>,
        participants: Vec<ParticipantId>,
    ) -> Result<Self, SettlementError> {
        let name = name.into();
        check_name(&name)?;
        check_participants(&participants)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            participants,
            expenses: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Record an expense. The payer must belong to the group.
    pub fn add_expense(&mut self, expense: Expense) -> Result<&Expense, SettlementError> {
        validate_amount(expense.amount())?;
        if !self.participants.contains(expense.payer()) {
            return Err(SettlementError::UnresolvedPayer {
                payer: expense.payer().clone(),
            });
        }
        self.expenses.push(expense);
        self.expenses
            .last()
            .ok_or_else(|| SettlementError::invalid_input("expense was not recorded"))
    }

    /// Remove an expense by id, returning it.
    pub fn remove_expense(&mut self, id: Uuid) -> Result<Expense, SettlementError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id() == id)
            .ok_or(SettlementError::ExpenseNotFound { id })?;
        Ok(self.expenses.remove(index))
    }

    /// Give the group a new, non-blank name.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), SettlementError> {
        let name = name.into();
        check_name(&name)?;
        debug!("renaming group {} from '{}' to '{}'", self.id, self.name, name);
        self.name = name;
        Ok(())
    }

    /// Replace the participant list.
    ///
    /// The new list must be non-empty, free of repeats, and still contain
    /// everyone who paid for a recorded expense. On error the group is
    /// left unchanged.
    pub fn set_participants(
        &mut self,
        participants: Vec<ParticipantId>,
    ) -> Result<(), SettlementError> {
        check_participants(&participants)?;
        if let Some(orphan) = self
            .expenses
            .iter()
            .find(|e| !participants.contains(e.payer()))
        {
            return Err(SettlementError::UnresolvedPayer {
                payer: orphan.payer().clone(),
            });
        }
        debug!(
            "group {} participants: {} -> {}",
            self.id,
            self.participants.len(),
            participants.len()
        );
        self.participants = participants;
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_spent(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    pub fn balances(&self) -> Result<BalanceSheet, SettlementError> {
        BalanceSheet::compute(&self.participants, &self.expenses)
    }

    /// Transfers that settle the group right now.
    pub fn settlements(&self) -> Result<Vec<Settlement>, SettlementError> {
        SettlementEngine::compute_settlements(&self.participants, &self.expenses)
    }

    pub fn plan(&self) -> Result<SettlementPlan, SettlementError> {
        SettlementEngine::plan(&self.participants, &self.expenses)
    }
}
