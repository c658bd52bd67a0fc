// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Card/PIN allow-list
//!
//! - `store` - Immutable in-memory set of accepted card/PIN pairs
//! - `validator` - Exact-match validation against the store

pub mod store;
pub mod validator;

pub use store::{CredentialRecord, CredentialStore};
pub use validator::{
    CredentialValidator, OutcomeMessages, ValidationOutcome, LOGIN_MESSAGES, SCAN_MESSAGES,
};
