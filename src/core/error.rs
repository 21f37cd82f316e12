use crate::core::participant::ParticipantId;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while validating expense data or computing settlements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Input that cannot produce a meaningful settlement: too few
    /// participants, a negative or non-finite amount, or a total that
    /// overflows.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An expense names a payer that is not a participant of the group.
    #[error("payer '{payer}' is not a participant")]
    UnresolvedPayer { payer: ParticipantId },

    /// The same participant was supplied more than once.
    #[error("participant '{participant}' is listed more than once")]
    DuplicateParticipant { participant: ParticipantId },

    #[error("expense {id} not found")]
    ExpenseNotFound { id: Uuid },
}

impl SettlementError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        SettlementError::InvalidInput {
            reason: reason.into(),
        }
    }
}
