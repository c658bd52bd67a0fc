// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Card/PIN validation against the credential store

use std::sync::Arc;

use super::store::CredentialStore;

/// Result of validating one card/PIN pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub card: Option<String>,
    pub pin: Option<String>,
    pub message: String,
}

/// User-facing messages attached to an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeMessages {
    pub accepted: &'static str,
    pub rejected: &'static str,
}

/// Messages for pairs read from a scanned card
pub const SCAN_MESSAGES: OutcomeMessages = OutcomeMessages {
    accepted: "✓ تم التعرف!",
    rejected: "✗ بيانات غير صحيحة",
};

/// Messages for pairs typed in by the user
pub const LOGIN_MESSAGES: OutcomeMessages = OutcomeMessages {
    accepted: "✓ دخول ناجح",
    rejected: "✗ بيانات خاطئة",
};

/// Validates candidate pairs against an injected [`CredentialStore`]
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    store: Arc<CredentialStore>,
}

impl CredentialValidator {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// True iff the exact pair exists in the store.
    ///
    /// Inputs are expected to be trimmed already.
    pub fn is_valid(&self, card: &str, pin: &str) -> bool {
        self.store.contains(card, pin)
    }

    /// Validate a pair and keep both values in the outcome
    pub fn validate(&self, card: &str, pin: &str, messages: OutcomeMessages) -> ValidationOutcome {
        let is_valid = self.is_valid(card, pin);
        let message = if is_valid {
            messages.accepted
        } else {
            messages.rejected
        };

        ValidationOutcome {
            is_valid,
            card: Some(card.to_string()),
            pin: Some(pin.to_string()),
            message: message.to_string(),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}
