// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Card scan API endpoint module
//!
//! Provides POST /api/ocr for reading a card number and PIN from a photo.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{read_text, scan_handler, scan_result};
pub use request::{ScanUpload, EMPTY_FILE_MESSAGE, IMAGE_FIELD, NO_IMAGE_MESSAGE};
pub use response::{ScanResponse, NOT_RECOGNIZED_MESSAGE};
