// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime session loading shared by the detection and recognition models

use anyhow::{Context, Result};
use ndarray::{Array4, ArrayD};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A loaded ONNX model with its first input/output names
#[derive(Clone)]
pub struct OnnxModel {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxModel {
    /// Load a model with CPU-only execution
    ///
    /// `default_input`/`default_output` are used when the graph does not
    /// report names.
    pub fn load(
        model_path: &Path,
        intra_threads: usize,
        default_input: &str,
        default_output: &str,
    ) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads.max(1))
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| default_input.to_string());

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .unwrap_or_else(|| default_output.to_string());

        debug!(
            "Loaded {} - input: {}, output: {}",
            model_path.display(),
            input_name,
            output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Run the model on one NCHW tensor and return the first output
    pub fn run(&self, input: &Array4<f32>) -> Result<ArrayD<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session mutex poisoned"))?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        Ok(output.to_owned())
    }
}
