use crate::core::participant::ParticipantId;
use crate::engine::settlement::Settlement;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a recorded settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Pending,
    Completed,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::Pending => write!(f, "PENDING"),
            SettlementStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// A settlement transfer recorded against an expense group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    id: Uuid,
    group_id: Uuid,
    from: ParticipantId,
    to: ParticipantId,
    amount: Decimal,
    status: SettlementStatus,
    created_at: DateTime<Utc>,
    /// Set when the record is marked completed.
    settled_at: Option<DateTime<Utc>>,
}

impl SettlementRecord {
    /// New pending record for a computed transfer.
    pub fn pending(group_id: Uuid, settlement: &Settlement) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            from: settlement.from.clone(),
            to: settlement.to.clone(),
            amount: settlement.amount,
            status: SettlementStatus::Pending,
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    pub(crate) fn set_amount(&mut self, amount: Decimal) {
        self.amount = amount;
    }

    pub(crate) fn complete(&mut self, at: DateTime<Utc>) {
        self.status = SettlementStatus::Completed;
        self.settled_at = Some(at);
    }

    /// Whether this is the pending record for `group_id`'s `from -> to` pair.
    pub fn is_pending_between(&self, group_id: Uuid, from: &ParticipantId, to: &ParticipantId) -> bool {
        self.status == SettlementStatus::Pending
            && self.group_id == group_id
            && &self.from == from
            && &self.to == to
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    pub fn from(&self) -> &ParticipantId {
        &self.from
    }

    pub fn to(&self) -> &ParticipantId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }
}
