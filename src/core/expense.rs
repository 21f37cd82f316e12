use crate::core::error::SettlementError;
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A single "who paid what" record in an expense group.
///
/// The settlement engine only looks at `payer` and `amount`; the id,
/// description and timestamp are carried for the group and its callers.
///
/// # Examples
///
/// ```
/// use splitwise_engine::core::expense::Expense;
/// use splitwise_engine::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(ParticipantId::new("alice"), dec!(90))
///     .with_description("dinner");
///
/// assert_eq!(dinner.amount(), dec!(90));
/// assert_eq!(dinner.description(), Some("dinner"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    /// The participant who paid.
    payer: ParticipantId,
    /// Amount paid. Validated as non-negative before any settlement math.
    amount: Decimal,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense record.
    ///
    /// The amount is not validated here; the engine and the group
    /// aggregate reject negative amounts with [`SettlementError::InvalidInput`].
    pub fn new(payer: ParticipantId, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            payer,
            amount,
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(id: Uuid, payer: ParticipantId, amount: Decimal) -> Self {
        Self {
            id,
            ..Self::new(payer, amount)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Check that an amount can take part in settlement arithmetic.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, SettlementError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SettlementError::invalid_input(format!(
            "amount must not be negative, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Convert a floating point amount (e.g. from a JSON number) into a decimal.
///
/// NaN and infinities are rejected instead of leaking into the balances.
pub fn parse_amount_f64(value: f64) -> Result<Decimal, SettlementError> {
    if !value.is_finite() {
        return Err(SettlementError::invalid_input(format!(
            "amount must be a finite number, got {}",
            value
        )));
    }
    // Display gives the shortest representation that round-trips, so
    // 0.1 becomes exactly 0.1 rather than its binary approximation.
    let amount = Decimal::from_str(&value.to_string()).map_err(|e| {
        SettlementError::invalid_input(format!("amount {} is out of range: {}", value, e))
    })?;
    validate_amount(amount)
}

/// Parse a textual amount such as `"1,250.50"`.
pub fn parse_amount_str(value: &str) -> Result<Decimal, SettlementError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    let amount = Decimal::from_str(&cleaned).map_err(|e| {
        SettlementError::invalid_input(format!("invalid amount '{}': {}", value, e))
    })?;
    validate_amount(amount)
}
