// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use crate::credentials::ValidationOutcome;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateResponse {
    pub valid: bool,
    pub message: String,
}

impl From<ValidationOutcome> for ValidateResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            valid: outcome.is_valid,
            message: outcome.message,
        }
    }
}
