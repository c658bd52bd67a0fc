// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credential validation API endpoint module
//!
//! Provides POST /api/validate for checking a card/PIN pair without a scan.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::validate_handler;
pub use request::ValidateRequest;
pub use response::ValidateResponse;
