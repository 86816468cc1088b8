//! ONNX inference engine for the credit decision classifier

use crate::config::ModelConfig;
use crate::features::SelectedFeatures;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::models::Classifier;
use anyhow::{anyhow, Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Name the credit decision model is registered under.
pub const MODEL_NAME: &str = "debito_automatico";

/// Single-model inference engine using ONNX Runtime
pub struct InferenceEngine {
    /// Session runs need exclusive access
    model: Mutex<LoadedModel>,
    name: String,
    input_width: usize,
}

impl InferenceEngine {
    /// Create an inference engine from configuration.
    ///
    /// Tries `model_path` first and `fallback_model_path` second.
    pub fn new(config: &ModelConfig, input_width: usize) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads)?;
        let model = loader.load_with_fallback(
            &config.model_path,
            config.fallback_model_path.as_deref().map(Path::new),
            MODEL_NAME,
        )?;

        info!(
            model = %model.name,
            input_width = input_width,
            "Inference engine initialized"
        );

        Ok(Self::from_model(model, input_width))
    }

    /// Wrap an already loaded model
    pub fn from_model(model: LoadedModel, input_width: usize) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
            input_width,
        }
    }

    /// Run the model on a raw feature row
    pub fn predict_row(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.input_width {
            return Err(anyhow!(
                "Expected {} features, got {}",
                self.input_width,
                features.len()
            ));
        }

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;

        self.run_model(&mut model, features)
    }

    fn run_model(&self, model: &mut LoadedModel, features: &[f32]) -> Result<f64> {
        use ort::value::Tensor;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        self.extract_probability(&outputs, &model.output_name)
    }

    /// Extract the class 1 probability from model output.
    ///
    /// Handles tensor outputs as well as the seq(map) outputs produced by
    /// some tree-model exporters.
    fn extract_probability(
        &self,
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<f64> {
        if let Some(output) = outputs.get(output_name) {
            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let prob = Self::class_one_from_tensor(&shape, data)?;
                debug!(model = %self.name, prob = prob, "Extracted from tensor");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(output) {
                    return Ok(prob);
                }
            }
        }

        // Fallback: try every non-label output
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let prob = Self::class_one_from_tensor(&shape, data)?;
                debug!(model = %self.name, output = %name, prob = prob, "Extracted from tensor (fallback)");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        Err(anyhow!(
            "Model {} produced no readable probability output",
            self.name
        ))
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        let map_value = maps.first().ok_or_else(|| anyhow!("Empty sequence"))?;

        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            debug!(model = %self.name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(anyhow!("No probability found in map"))
    }

    /// Class 1 probability from `[1, n]` or `[n]` tensor data
    fn class_one_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Result<f64> {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let num_classes = dims.last().copied().unwrap_or(0);

        match num_classes {
            n if n >= 2 => data
                .get(1)
                .map(|&p| p as f64)
                .ok_or_else(|| anyhow!("Probability tensor shorter than its shape")),
            1 => data
                .first()
                .map(|&p| p as f64)
                .ok_or_else(|| anyhow!("Empty probability tensor")),
            _ => Err(anyhow!("Unexpected probability tensor shape {:?}", dims)),
        }
    }
}

impl Classifier for InferenceEngine {
    fn predict_proba(&self, features: &SelectedFeatures) -> Result<f64> {
        self.predict_row(&features.to_f32_vec())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
