// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scan response types

use serde::{Deserialize, Serialize};

use crate::credentials::ValidationOutcome;

/// Message when fewer than two numbers were read
pub const NOT_RECOGNIZED_MESSAGE: &str = "لم يتم التعرف على الأرقام";

/// Response from a card scan
///
/// `card` and `pin` serialize as `null` when nothing was recognized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResponse {
    /// Same as `valid`
    pub success: bool,
    pub card: Option<String>,
    pub pin: Option<String>,
    pub valid: bool,
    pub message: String,
}

impl ScanResponse {
    pub fn not_recognized() -> Self {
        Self {
            success: false,
            card: None,
            pin: None,
            valid: false,
            message: NOT_RECOGNIZED_MESSAGE.to_string(),
        }
    }
}

impl From<ValidationOutcome> for ScanResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            success: outcome.is_valid,
            card: outcome.card,
            pin: outcome.pin,
            valid: outcome.is_valid,
            message: outcome.message,
        }
    }
}
