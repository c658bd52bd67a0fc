// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory credential store

use serde::{Deserialize, Serialize};

/// A single accepted card/PIN pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Card identifier as printed on the card
    pub card: String,
    /// PIN paired with the card
    pub pin: String,
}

impl CredentialRecord {
    pub fn new(card: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            card: card.into(),
            pin: pin.into(),
        }
    }

    /// Exact, case-sensitive comparison of both fields
    pub fn matches(&self, card: &str, pin: &str) -> bool {
        self.card == card && self.pin == pin
    }
}

/// Built-in allow-list shipped with the service
const BUILTIN_CARDS: &[(&str, &str)] = &[
    ("2269727192", "455427"),
    ("admin", "12345"),
    ("1234567890", "123456"),
    ("9876543210", "654321"),
];

/// Immutable set of accepted card/PIN pairs
///
/// Built once at startup and shared read-only between requests.
/// Duplicate records are kept as given.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// Create a store from an explicit list of records
    pub fn new(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    /// Create the store holding the built-in allow-list
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_CARDS
                .iter()
                .map(|(card, pin)| CredentialRecord::new(*card, *pin))
                .collect(),
        )
    }

    /// Linear scan for an exact match
    pub fn contains(&self, card: &str, pin: &str) -> bool {
        self.records.iter().any(|r| r.matches(card, pin))
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
