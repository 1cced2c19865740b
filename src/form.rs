//! Transfer form state and validation.
//!
//! The recipient list is a fixed-size array so its length can never change;
//! each slot is edited independently and only checked when a dispatch runs.

use crate::utils;
use ethers::types::Address;
use thiserror::Error;

/// Number of recipient inputs on the form
pub const RECIPIENT_COUNT: usize = 3;

/// Form-level validation failures, shown in the top-level error banner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No valid recipient addresses. Enter at least one 0x-prefixed address.")]
    NoValidRecipients,
    #[error("Invalid token contract address")]
    InvalidTokenAddress,
    #[error("Amount must be a positive number")]
    InvalidAmount,
}

/// Validated inputs shared by every recipient in one dispatch tick
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub recipients: Vec<Address>,
    pub token: Address,
    /// Human-unit amount string, converted once the token decimals are known
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    recipients: [String; RECIPIENT_COUNT],
    pub token_address: String,
    pub amount: String,
}

impl FormState {
    pub fn new(recipients: [String; RECIPIENT_COUNT], token_address: String, amount: String) -> Self {
        Self {
            recipients,
            token_address,
            amount,
        }
    }

    pub fn recipients(&self) -> &[String; RECIPIENT_COUNT] {
        &self.recipients
    }

    /// Mutable access to a single recipient slot, `None` when out of range
    pub fn recipient_mut(&mut self, index: usize) -> Option<&mut String> {
        self.recipients.get_mut(index)
    }

    /// Replace one recipient slot. Returns false if the index is out of range.
    pub fn set_recipient(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.recipients.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Whether the hold button may be pressed: at least one recipient,
    /// a token address and an amount must be non-empty
    pub fn is_submittable(&self) -> bool {
        self.recipients.iter().any(|r| !r.trim().is_empty())
            && !self.token_address.trim().is_empty()
            && !self.amount.trim().is_empty()
    }

    /// Recipients that parse as valid addresses, in slot order
    pub fn valid_recipients(&self) -> Vec<Address> {
        self.recipients
            .iter()
            .filter_map(|r| utils::parse_address(r))
            .collect()
    }

    /// Validate the form in dispatch order: recipients, token, amount
    pub fn validate(&self) -> Result<TransferRequest, ValidationError> {
        let recipients = self.valid_recipients();
        if recipients.is_empty() {
            return Err(ValidationError::NoValidRecipients);
        }

        let token =
            utils::parse_address(&self.token_address).ok_or(ValidationError::InvalidTokenAddress)?;

        if utils::parse_positive_amount(&self.amount).is_none() {
            return Err(ValidationError::InvalidAmount);
        }

        Ok(TransferRequest {
            recipients,
            token,
            amount: self.amount.trim().to_string(),
        })
    }
}
