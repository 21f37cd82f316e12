use crate::core::balance::{BalanceSheet, SETTLED_TOLERANCE};
use crate::core::participant::ParticipantId;
use crate::engine::settlement::Settlement;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Worst-case error introduced by rounding one transfer to cents.
const ROUNDING_SLACK: Decimal = dec!(0.005);

/// How well the transfers cover one participant's net balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residual {
    pub participant: ParticipantId,
    /// Net balance from the balance sheet.
    pub expected: Decimal,
    /// Received minus sent across all transfers.
    pub settled: Decimal,
    /// Number of transfers this participant appears in.
    pub transfers: usize,
}

impl Residual {
    /// Amount left unsettled, in absolute terms.
    pub fn gap(&self) -> Decimal {
        (self.expected - self.settled).abs()
    }

    /// One cent of settling tolerance plus half a cent per rounded transfer.
    pub fn tolerance(&self) -> Decimal {
        SETTLED_TOLERANCE + ROUNDING_SLACK * Decimal::from(self.transfers)
    }

    pub fn is_cleared(&self) -> bool {
        self.gap() <= self.tolerance()
    }
}

/// Independent check that a list of transfers clears a balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementCheck {
    /// One entry per participant, in participant order.
    pub residuals: Vec<Residual>,
    pub transfer_count: usize,
    /// Total spent by the group.
    pub gross_paid: Decimal,
    /// Sum of all transfer amounts.
    pub total_transferred: Decimal,
    /// Transfers that are non-positive, self-directed, or name a stranger.
    pub malformed: Vec<Settlement>,
}

impl SettlementCheck {
    pub fn verify(sheet: &BalanceSheet, settlements: &[Settlement]) -> Self {
        let mut flows: HashMap<&ParticipantId, (Decimal, usize)> = sheet
            .positions()
            .iter()
            .map(|p| (&p.participant, (Decimal::ZERO, 0)))
            .collect();
        let mut malformed = Vec::new();

        for settlement in settlements {
            let well_formed = settlement.amount > Decimal::ZERO
                && settlement.from != settlement.to
                && flows.contains_key(&settlement.from)
                && flows.contains_key(&settlement.to);
            if !well_formed {
                malformed.push(settlement.clone());
                continue;
            }
            if let Some((flow, count)) = flows.get_mut(&settlement.from) {
                *flow -= settlement.amount;
                *count += 1;
            }
            if let Some((flow, count)) = flows.get_mut(&settlement.to) {
                *flow += settlement.amount;
                *count += 1;
            }
        }

        let residuals = sheet
            .positions()
            .iter()
            .map(|p| {
                let (settled, transfers) = flows
                    .get(&p.participant)
                    .copied()
                    .unwrap_or((Decimal::ZERO, 0));
                Residual {
                    participant: p.participant.clone(),
                    expected: p.net,
                    settled,
                    transfers,
                }
            })
            .collect();

        SettlementCheck {
            residuals,
            transfer_count: settlements.len(),
            gross_paid: sheet.total(),
            total_transferred: settlements.iter().map(|s| s.amount).sum(),
            malformed,
        }
    }

    /// Every participant is cleared and every transfer is well formed.
    pub fn is_valid(&self) -> bool {
        self.malformed.is_empty() && self.residuals.iter().all(Residual::is_cleared)
    }

    /// Largest unsettled amount across participants.
    pub fn max_gap(&self) -> Decimal {
        self.residuals
            .iter()
            .map(Residual::gap)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl std::fmt::Display for SettlementCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Check ===")?;
        writeln!(f, "Gross Paid:        {}", self.gross_paid.round_dp(2))?;
        writeln!(f, "Transferred:       {}", self.total_transferred)?;
        writeln!(f, "Transfers:         {}", self.transfer_count)?;
        writeln!(f, "Max Gap:           {}", self.max_gap().round_dp(4))?;
        writeln!(f, "Valid:             {}", self.is_valid())?;

        for residual in self.residuals.iter().filter(|r| !r.is_cleared()) {
            writeln!(
                f,
                "  {} expected {} settled {}",
                residual.participant,
                residual.expected.round_dp(2),
                residual.settled
            )?;
        }
        for settlement in &self.malformed {
            writeln!(f, "  malformed transfer {}", settlement)?;
        }
        Ok(())
    }
}
