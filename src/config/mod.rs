// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command-line flags and environment variables

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::vision::model_manager::{OcrModelConfig, DEFAULT_OCR_MODEL_DIR};
use crate::vision::MAX_IMAGE_SIZE;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid listen host '{0}'")]
    InvalidHost(String),

    #[error("OCR thread count must be at least 1")]
    InvalidThreadCount,

    #[error("Upload limit must be greater than zero")]
    InvalidUploadLimit,
}

/// Card scanning HTTP service
#[derive(Parser, Debug, Clone)]
#[command(name = "cardscan-server")]
#[command(version)]
#[command(about = "Card and PIN OCR service", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CARDSCAN_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CARDSCAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding the PaddleOCR ONNX models
    #[arg(long, env = "OCR_MODEL_DIR", default_value = DEFAULT_OCR_MODEL_DIR)]
    pub ocr_model_dir: PathBuf,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// ONNX Runtime threads per OCR session
    #[arg(long, env = "OCR_THREADS", default_value_t = 4)]
    pub ocr_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ocr_model_dir: PathBuf::from(DEFAULT_OCR_MODEL_DIR),
            max_upload_bytes: MAX_IMAGE_SIZE,
            ocr_threads: 4,
        }
    }
}

impl ServerConfig {
    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ocr_threads == 0 {
            return Err(ConfigError::InvalidThreadCount);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidUploadLimit);
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn ocr_model_config(&self) -> OcrModelConfig {
        OcrModelConfig::new(&self.ocr_model_dir, self.ocr_threads)
    }
}
