use crate::book::record::{SettlementRecord, SettlementStatus};
use crate::engine::settlement::Settlement;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by [`SettlementBook`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("settlement {record_id} not found in group {group_id}")]
    RecordNotFound { group_id: Uuid, record_id: Uuid },
    #[error("settlement {record_id} is already completed")]
    AlreadyCompleted { record_id: Uuid },
}

/// In-memory book of settlement records across expense groups.
///
/// Recording a fresh computation merges into existing pending records:
/// at most one pending record exists per `(group, from, to)`, and it
/// always carries the latest computed amount. Completed records are
/// history and are never touched again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementBook {
    records: Vec<SettlementRecord>,
}

impl SettlementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record computed transfers for a group.
    ///
    /// Returns the inserted or updated records, in transfer order.
    pub fn record(&mut self, group_id: Uuid, settlements: &[Settlement]) -> Vec<SettlementRecord> {
        let mut touched = Vec::with_capacity(settlements.len());

        for settlement in settlements {
            let existing = self
                .records
                .iter_mut()
                .find(|r| r.is_pending_between(group_id, &settlement.from, &settlement.to));

            let record = match existing {
                Some(record) => {
                    debug!(
                        "updating pending {} -> {} from {} to {}",
                        settlement.from,
                        settlement.to,
                        record.amount(),
                        settlement.amount
                    );
                    record.set_amount(settlement.amount);
                    record.clone()
                }
                None => {
                    let record = SettlementRecord::pending(group_id, settlement);
                    debug!("recording new pending {}", settlement);
                    self.records.push(record.clone());
                    record
                }
            };
            touched.push(record);
        }

        info!(
            "recorded {} settlements for group {}",
            touched.len(),
            group_id
        );
        touched
    }

    /// All records of a group, newest first.
    pub fn for_group(&self, group_id: Uuid) -> Vec<&SettlementRecord> {
        let mut records: Vec<&SettlementRecord> = self
            .records
            .iter()
            .filter(|r| r.group_id() == group_id)
            .collect();
        // Stable sort: records created in the same instant keep reverse insertion order.
        records.reverse();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        records
    }

    /// Pending records of a group, in insertion order.
    pub fn pending(&self, group_id: Uuid) -> Vec<&SettlementRecord> {
        self.records
            .iter()
            .filter(|r| r.group_id() == group_id && r.status() == SettlementStatus::Pending)
            .collect()
    }

    /// Mark a record as completed.
    pub fn complete(&mut self, group_id: Uuid, record_id: Uuid) -> Result<&SettlementRecord, BookError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == record_id && r.group_id() == group_id)
            .ok_or(BookError::RecordNotFound {
                group_id,
                record_id,
            })?;

        if record.status() == SettlementStatus::Completed {
            return Err(BookError::AlreadyCompleted { record_id });
        }

        record.complete(Utc::now());
        info!("settlement {} completed", record_id);
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
