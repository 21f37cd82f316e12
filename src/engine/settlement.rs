use crate::core::balance::{BalanceSheet, SETTLED_TOLERANCE};
use crate::core::error::SettlementError;
use crate::core::expense::Expense;
use crate::core::participant::ParticipantId;
use crate::engine::verification::SettlementCheck;
use log::{debug, trace};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A directed transfer that moves `amount` from a debtor to a creditor.
///
/// Amounts are strictly positive and rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        Self { from, to, amount }
    }
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

/// Round a transfer amount to cents, halves away from zero.
///
/// The result always carries exactly two decimal places.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Balances plus the transfers that clear them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    balances: BalanceSheet,
    settlements: Vec<Settlement>,
}

impl SettlementPlan {
    pub fn balances(&self) -> &BalanceSheet {
        &self.balances
    }

    /// Transfers in the order the sweep produced them.
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn into_settlements(self) -> Vec<Settlement> {
        self.settlements
    }

    /// Sum of all transfer amounts.
    pub fn total_transferred(&self) -> Decimal {
        self.settlements.iter().map(|s| s.amount).sum()
    }

    /// Check that the transfers clear every balance.
    pub fn check(&self) -> SettlementCheck {
        SettlementCheck::verify(&self.balances, &self.settlements)
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_valid()
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        writeln!(f, "Total spent:    {}", self.balances.total().round_dp(2))?;
        writeln!(f, "Equal share:    {}", self.balances.share().round_dp(2))?;
        writeln!(f, "Transfers:      {}", self.settlements.len())?;
        writeln!(f, "Transferred:    {}", self.total_transferred())?;
        writeln!(f, "Valid:          {}", self.is_valid())?;

        if self.settlements.is_empty() {
            writeln!(f, "\nEveryone is settled up.")?;
        } else {
            writeln!(f)?;
            for settlement in &self.settlements {
                writeln!(f, "  {}", settlement)?;
            }
        }
        Ok(())
    }
}

/// The debt simplification engine.
///
/// Turns "who paid what" into a list of transfers that brings every
/// participant back to their equal share.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Compute the transfers that settle an expense group.
    ///
    /// # Errors
    ///
    /// Fails before any arithmetic if the participants or expenses are
    /// unusable; see [`BalanceSheet::compute`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splitwise_engine::prelude::*;
    /// use rust_decimal_macros::dec;
    ///
    /// let friends: Vec<ParticipantId> = ["A", "B", "C"].into_iter().map(ParticipantId::from).collect();
    /// let expenses = vec![Expense::new(ParticipantId::new("A"), dec!(300))];
    ///
    /// let transfers = SettlementEngine::compute_settlements(&friends, &expenses).unwrap();
    /// assert_eq!(transfers.len(), 2);
    /// assert_eq!(transfers[0].from.as_str(), "B");
    /// assert_eq!(transfers[0].amount, dec!(100));
    /// ```
    pub fn compute_settlements(
        participants: &[ParticipantId],
        expenses: &[Expense],
    ) -> Result<Vec<Settlement>, SettlementError> {
        let sheet = BalanceSheet::compute(participants, expenses)?;
        Ok(Self::settle(&sheet))
    }

    /// Like [`compute_settlements`](Self::compute_settlements), but keeps
    /// the balance sheet alongside the transfers.
    pub fn plan(
        participants: &[ParticipantId],
        expenses: &[Expense],
    ) -> Result<SettlementPlan, SettlementError> {
        let balances = BalanceSheet::compute(participants, expenses)?;
        let settlements = Self::settle(&balances);
        Ok(SettlementPlan {
            balances,
            settlements,
        })
    }

    /// Greedy two-queue sweep over a balance sheet.
    ///
    /// # Algorithm
    ///
    /// 1. Debtors and creditors are queued in participant order. Nobody
    ///    is sorted by amount.
    /// 2. The head debtor pays the head creditor `min(owed, due)`.
    /// 3. Whichever side drops below one cent leaves its queue.
    /// 4. Stop when either queue is empty.
    ///
    /// Every iteration retires at least one participant, so there are at
    /// most `debtors + creditors - 1` transfers. The result is
    /// deterministic but not the minimum possible transfer count.
    pub fn settle(sheet: &BalanceSheet) -> Vec<Settlement> {
        let mut debtors: VecDeque<(ParticipantId, Decimal)> = sheet.debtors().into();
        let mut creditors: VecDeque<(ParticipantId, Decimal)> = sheet.creditors().into();

        debug!(
            "settling {} debtors against {} creditors (share {})",
            debtors.len(),
            creditors.len(),
            sheet.share()
        );

        let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());

        loop {
            let (Some(debtor), Some(creditor)) = (debtors.front_mut(), creditors.front_mut())
            else {
                break;
            };

            let amount = debtor.1.min(creditor.1);
            if amount > Decimal::ZERO {
                let settlement =
                    Settlement::new(debtor.0.clone(), creditor.0.clone(), round_to_cents(amount));
                trace!("transfer {}", settlement);
                settlements.push(settlement);
            }

            debtor.1 -= amount;
            creditor.1 -= amount;
            let debtor_done = debtor.1 < SETTLED_TOLERANCE;
            let creditor_done = creditor.1 < SETTLED_TOLERANCE;

            if debtor_done {
                debtors.pop_front();
            }
            if creditor_done {
                creditors.pop_front();
            }
        }

        debug!("produced {} transfers", settlements.len());
        settlements
    }
}

/// Shorthand for [`SettlementEngine::compute_settlements`].
pub fn compute_settlements(
    participants: &[ParticipantId],
    expenses: &[Expense],
) -> Result<Vec<Settlement>, SettlementError> {
    SettlementEngine::compute_settlements(participants, expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    fn paid(payer: &str, amount: Decimal) -> Expense {
        Expense::new(ParticipantId::new(payer), amount)
    }

    fn transfer(from: &str, to: &str, amount: Decimal) -> Settlement {
        Settlement::new(ParticipantId::new(from), ParticipantId::new(to), amount)
    }

    #[test]
    fn test_single_creditor() {
        let expenses = vec![paid("A", dec!(300)), paid("B", dec!(0)), paid("C", dec!(0))];
        let result = SettlementEngine::compute_settlements(&ids(&["A", "B", "C"]), &expenses).unwrap();
        assert_eq!(
            result,
            vec![transfer("B", "A", dec!(100)), transfer("C", "A", dec!(100))]
        );
    }

    #[test]
    fn test_no_expenses() {
        let result = SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_equal_payers_settle_to_nothing() {
        let expenses = vec![paid("A", dec!(300)), paid("B", dec!(300)), paid("C", dec!(300))];
        let result = SettlementEngine::compute_settlements(&ids(&["A", "B", "C"]), &expenses).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_head_debtor_spans_creditors() {
        // share 100: D and E owe 100 each, C1 is owed 50, C2 is owed 150
        let expenses = vec![paid("C1", dec!(150)), paid("C2", dec!(250))];
        let result =
            SettlementEngine::compute_settlements(&ids(&["D", "C1", "C2", "E"]), &expenses).unwrap();
        assert_eq!(
            result,
            vec![
                transfer("D", "C1", dec!(50)),
                transfer("D", "C2", dec!(50)),
                transfer("E", "C2", dec!(100)),
            ]
        );
    }

    #[test]
    fn test_order_follows_participant_order_not_amount() {
        // share 60: X owes 10, Y owes 50, Z is owed 60
        let expenses = vec![paid("X", dec!(50)), paid("Y", dec!(10)), paid("Z", dec!(120))];
        let result = SettlementEngine::compute_settlements(&ids(&["X", "Y", "Z"]), &expenses).unwrap();
        assert_eq!(
            result,
            vec![transfer("X", "Z", dec!(10)), transfer("Y", "Z", dec!(50))]
        );
    }

    #[test]
    fn test_amounts_are_rounded_to_cents() {
        let expenses = vec![paid("A", dec!(100))];
        let result = SettlementEngine::compute_settlements(&ids(&["A", "B", "C"]), &expenses).unwrap();
        assert_eq!(
            result,
            vec![transfer("B", "A", dec!(33.33)), transfer("C", "A", dec!(33.33))]
        );
        assert!(result.iter().all(|s| s.amount.scale() == 2));
    }

    #[test]
    fn test_sub_cent_differences_are_ignored() {
        // share 10.005: both nets are within a cent of zero
        let expenses = vec![paid("A", dec!(10.00)), paid("B", dec!(10.01))];
        let result = SettlementEngine::compute_settlements(&ids(&["A", "B"]), &expenses).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        assert!(matches!(
            SettlementEngine::compute_settlements(&[], &[]),
            Err(SettlementError::InvalidInput { .. })
        ));
        assert!(matches!(
            SettlementEngine::compute_settlements(&ids(&["solo"]), &[]),
            Err(SettlementError::InvalidInput { .. })
        ));
        assert!(matches!(
            SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[paid("A", dec!(-1))]),
            Err(SettlementError::InvalidInput { .. })
        ));
        assert_eq!(
            SettlementEngine::compute_settlements(&ids(&["A", "B"]), &[paid("Q", dec!(1))]),
            Err(SettlementError::UnresolvedPayer {
                payer: ParticipantId::new("Q")
            })
        );
    }

    #[test]
    fn test_plan_keeps_balances() {
        let expenses = vec![paid("A", dec!(90))];
        let plan = SettlementEngine::plan(&ids(&["A", "B", "C"]), &expenses).unwrap();
        assert_eq!(plan.balances().share(), dec!(30));
        assert_eq!(plan.settlements().len(), 2);
        assert_eq!(plan.total_transferred(), dec!(60));
        assert!(plan.is_valid());
    }

    #[test]
    fn test_round_to_cents_midpoint() {
        assert_eq!(round_to_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_to_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_to_cents(dec!(33.3333333)), dec!(33.33));
        assert_eq!(round_to_cents(dec!(66.666666)), dec!(66.67));
    }
}
