use crate::core::error::SettlementError;
use crate::core::expense::{validate_amount, Expense};
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net balances within this distance of zero count as settled.
///
/// This is a currency rounding tolerance (one cent), not a tunable.
pub const SETTLED_TOLERANCE: Decimal = dec!(0.01);

/// Where a participant stands after the equal split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "amount", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    /// Owes the group this (positive) amount.
    Debtor(Decimal),
    /// Is owed this (positive) amount.
    Creditor(Decimal),
    /// Within [`SETTLED_TOLERANCE`] of zero.
    Settled,
}

/// One participant's row in the balance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub participant: ParticipantId,
    /// Total paid by this participant across all expenses.
    pub paid: Decimal,
    /// `paid - share`. Positive = net creditor, negative = net debtor.
    pub net: Decimal,
}

impl Position {
    pub fn standing(&self) -> Standing {
        if self.net < -SETTLED_TOLERANCE {
            Standing::Debtor(-self.net)
        } else if self.net > SETTLED_TOLERANCE {
            Standing::Creditor(self.net)
        } else {
            Standing::Settled
        }
    }
}

/// Per-participant balances of an expense group under an equal split.
///
/// Built fresh from a snapshot of participants and expenses; nothing is
/// cached between calls. Positions keep the caller's participant order,
/// which the settlement sweep depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    positions: Vec<Position>,
    total: Decimal,
    share: Decimal,
}

impl BalanceSheet {
    /// Validate the inputs and compute every participant's net balance.
    ///
    /// # Errors
    ///
    /// - [`SettlementError::InvalidInput`] for fewer than two participants,
    ///   a negative amount, or a total that overflows.
    /// - [`SettlementError::DuplicateParticipant`] when a participant repeats.
    /// - [`SettlementError::UnresolvedPayer`] when a payer is not a participant.
    pub fn compute(
        participants: &[ParticipantId],
        expenses: &[Expense],
    ) -> Result<Self, SettlementError> {
        if participants.len() < 2 {
            return Err(SettlementError::invalid_input(format!(
                "at least two participants are required, got {}",
                participants.len()
            )));
        }

        let mut index: HashMap<&ParticipantId, usize> = HashMap::with_capacity(participants.len());
        for (i, participant) in participants.iter().enumerate() {
            if index.insert(participant, i).is_some() {
                return Err(SettlementError::DuplicateParticipant {
                    participant: participant.clone(),
                });
            }
        }

        let mut paid = vec![Decimal::ZERO; participants.len()];
        for expense in expenses {
            let amount = validate_amount(expense.amount())?;
            let slot = index
                .get(expense.payer())
                .copied()
                .ok_or_else(|| SettlementError::UnresolvedPayer {
                    payer: expense.payer().clone(),
                })?;
            paid[slot] = paid[slot]
                .checked_add(amount)
                .ok_or_else(|| SettlementError::invalid_input("paid total overflows"))?;
        }

        let total = paid.iter().try_fold(Decimal::ZERO, |acc, p| acc.checked_add(*p));
        let total = total.ok_or_else(|| SettlementError::invalid_input("group total overflows"))?;
        let share = total / Decimal::from(participants.len());

        let positions = participants
            .iter()
            .zip(paid)
            .map(|(participant, paid)| Position {
                participant: participant.clone(),
                paid,
                net: paid - share,
            })
            .collect();

        Ok(Self {
            positions,
            total,
            share,
        })
    }

    /// Sum of all expense amounts.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Equal share owed by each participant.
    pub fn share(&self) -> Decimal {
        self.share
    }

    /// All positions, in participant order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, participant: &ParticipantId) -> Option<&Position> {
        self.positions.iter().find(|p| &p.participant == participant)
    }

    /// Total paid by a participant, zero if unknown.
    pub fn paid(&self, participant: &ParticipantId) -> Decimal {
        self.position(participant).map(|p| p.paid).unwrap_or(Decimal::ZERO)
    }

    /// Net balance of a participant, zero if unknown.
    pub fn net(&self, participant: &ParticipantId) -> Decimal {
        self.position(participant).map(|p| p.net).unwrap_or(Decimal::ZERO)
    }

    /// Debtors in participant order, with the amount each owes.
    pub fn debtors(&self) -> Vec<(ParticipantId, Decimal)> {
        self.positions
            .iter()
            .filter_map(|p| match p.standing() {
                Standing::Debtor(owed) => Some((p.participant.clone(), owed)),
                _ => None,
            })
            .collect()
    }

    /// Creditors in participant order, with the amount each is owed.
    pub fn creditors(&self) -> Vec<(ParticipantId, Decimal)> {
        self.positions
            .iter()
            .filter_map(|p| match p.standing() {
                Standing::Creditor(due) => Some((p.participant.clone(), due)),
                _ => None,
            })
            .collect()
    }

    /// Net balances sum to zero (up to the tolerance).
    pub fn is_balanced(&self) -> bool {
        let sum: Decimal = self.positions.iter().map(|p| p.net).sum();
        sum.abs() <= SETTLED_TOLERANCE
    }

    /// Whether every participant is already within tolerance of zero.
    pub fn is_settled(&self) -> bool {
        self.positions
            .iter()
            .all(|p| p.standing() == Standing::Settled)
    }
}

impl std::fmt::Display for BalanceSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances ===")?;
        writeln!(f, "Total spent:  {}", self.total.round_dp(2))?;
        writeln!(f, "Equal share:  {}", self.share.round_dp(2))?;
        for position in &self.positions {
            let status = match position.standing() {
                Standing::Debtor(_) => "OWES",
                Standing::Creditor(_) => "OWED",
                Standing::Settled => "SETTLED",
            };
            writeln!(
                f,
                "  {:<15} paid {:>12}  net {:>12}  [{}]",
                position.participant,
                position.paid.round_dp(2),
                position.net.round_dp(2),
                status
            )?;
        }
        Ok(())
    }
}
