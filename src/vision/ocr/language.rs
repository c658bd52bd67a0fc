// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Languages the recognition engine is built for

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrLanguage {
    English,
    Arabic,
}

impl OcrLanguage {
    /// Fixed set loaded at startup, in recognition order
    pub const ALL: [OcrLanguage; 2] = [OcrLanguage::English, OcrLanguage::Arabic];

    /// Short code, also the model sub-directory name
    pub fn code(&self) -> &'static str {
        match self {
            OcrLanguage::English => "en",
            OcrLanguage::Arabic => "ar",
        }
    }
}

impl fmt::Display for OcrLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
