use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_onnx::onnx::ModelProto;
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

use crate::application::ports::{ClassifierError, ClassifierLoader, EmotionClassifier};
use crate::domain::{RAW_LABELS, Waveform};

use super::feature_extractor::FeatureExtractor;

const DEFAULT_OUTPUT_NAME: &str = "logits";
const ATTENTION_MASK_INPUT: &str = "attention_mask";

/// Where the exported model and its preprocessor config come from.
#[derive(Debug, Clone)]
pub enum ModelSource {
    Hub {
        model_id: String,
        revision: String,
        onnx_file: String,
        preprocessor_file: String,
    },
    Local {
        model_dir: PathBuf,
        onnx_file: String,
        preprocessor_file: String,
    },
}

/// Optional overrides for graph input/output names. Detected from the graph when unset.
#[derive(Debug, Clone, Default)]
pub struct ModelIoNames {
    pub input: Option<String>,
    pub output: Option<String>,
}

/// Audio emotion classifier backed by an ONNX export evaluated with candle.
pub struct OnnxEmotionClassifier {
    model: ModelProto,
    extractor: FeatureExtractor,
    device: Device,
    input_name: String,
    mask_name: Option<String>,
    output_name: String,
}

impl OnnxEmotionClassifier {
    pub fn from_files(
        model_path: &Path,
        preprocessor_path: &Path,
        io_names: &ModelIoNames,
    ) -> Result<Self, ClassifierError> {
        // candle-onnx materializes initializers on the CPU, so inputs must live there too.
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = %model_path.display(),
            "Initializing ONNX emotion classifier"
        );

        let extractor = FeatureExtractor::from_file(preprocessor_path)?;
        let model = candle_onnx::read_file(model_path)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("onnx model: {}", e)))?;

        let (input_name, mask_name, output_name) = resolve_io_names(&model, io_names)?;

        tracing::info!(
            sampling_rate = extractor.config().sampling_rate,
            input = %input_name,
            attention_mask = mask_name.is_some(),
            output = %output_name,
            "ONNX emotion classifier loaded successfully"
        );

        Ok(Self {
            model,
            extractor,
            device,
            input_name,
            mask_name,
            output_name,
        })
    }

    fn run(&self, waveform: &Waveform) -> Result<Vec<f32>, ClassifierError> {
        let features = self.extractor.extract(&[waveform], &self.device)?;

        let mut inputs: HashMap<String, Tensor> = HashMap::new();
        inputs.insert(self.input_name.clone(), features.input_values);

        if let Some(mask_name) = &self.mask_name {
            let mask = match features.attention_mask {
                Some(mask) => mask,
                None => Tensor::ones(
                    (1, waveform.len()),
                    DType::I64,
                    &self.device,
                )
                .map_err(|e| ClassifierError::InferenceFailed(format!("attention mask: {}", e)))?,
            };
            inputs.insert(mask_name.clone(), mask);
        }

        let mut outputs = candle_onnx::simple_eval(&self.model, inputs)
            .map_err(|e| ClassifierError::InferenceFailed(format!("forward: {}", e)))?;

        let logits = outputs.remove(&self.output_name).ok_or_else(|| {
            ClassifierError::InferenceFailed(format!("missing output: {}", self.output_name))
        })?;

        logits
            .flatten_all()
            .and_then(|t| t.to_dtype(DType::F32))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| ClassifierError::InferenceFailed(format!("logits: {}", e)))
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, waveform: &Waveform) -> Result<usize, ClassifierError> {
        if waveform.is_empty() {
            return Err(ClassifierError::InferenceFailed("empty waveform".to_string()));
        }

        let logits = self.run(waveform)?;

        if logits.len() != RAW_LABELS.len() {
            tracing::warn!(
                logits = logits.len(),
                labels = RAW_LABELS.len(),
                "Model output size differs from the label table"
            );
        }

        let id = argmax(&logits)
            .ok_or_else(|| ClassifierError::InferenceFailed("model produced no scores".to_string()))?;

        tracing::debug!(id, score = logits[id], "Classifier top label");

        Ok(id)
    }
}

/// Index of the highest score. Ties go to the earliest index; NaN scores are ignored.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

fn resolve_io_names(
    model: &ModelProto,
    io_names: &ModelIoNames,
) -> Result<(String, Option<String>, String), ClassifierError> {
    let graph = model
        .graph
        .as_ref()
        .ok_or_else(|| ClassifierError::ModelLoadFailed("onnx model has no graph".to_string()))?;

    let initializers: HashSet<&str> = graph.initializer.iter().map(|t| t.name.as_str()).collect();
    let graph_inputs: Vec<&str> = graph
        .input
        .iter()
        .map(|i| i.name.as_str())
        .filter(|name| !initializers.contains(name))
        .collect();

    let input_name = match &io_names.input {
        Some(name) => name.clone(),
        None => graph_inputs
            .iter()
            .find(|name| **name != ATTENTION_MASK_INPUT)
            .map(|name| name.to_string())
            .ok_or_else(|| {
                ClassifierError::ModelLoadFailed("onnx graph declares no inputs".to_string())
            })?,
    };

    let mask_name = graph_inputs
        .iter()
        .find(|name| **name == ATTENTION_MASK_INPUT)
        .map(|name| name.to_string());

    let output_name = match &io_names.output {
        Some(name) => name.clone(),
        None => graph
            .output
            .iter()
            .find(|o| o.name == DEFAULT_OUTPUT_NAME)
            .or_else(|| graph.output.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| {
                ClassifierError::ModelLoadFailed("onnx graph declares no outputs".to_string())
            })?,
    };

    Ok((input_name, mask_name, output_name))
}

/// Resolves model files from the hub or disk and builds the classifier.
pub struct OnnxClassifierLoader {
    source: ModelSource,
    io_names: ModelIoNames,
}

impl OnnxClassifierLoader {
    pub fn new(source: ModelSource, io_names: ModelIoNames) -> Self {
        Self { source, io_names }
    }

    fn resolve_files(&self) -> Result<(PathBuf, PathBuf), ClassifierError> {
        match &self.source {
            ModelSource::Hub {
                model_id,
                revision,
                onnx_file,
                preprocessor_file,
            } => {
                tracing::info!(model = %model_id, revision = %revision, "Fetching model from hub");

                let api =
                    Api::new().map_err(|e| ClassifierError::ModelLoadFailed(e.to_string()))?;
                let repo = api.repo(Repo::with_revision(
                    model_id.clone(),
                    RepoType::Model,
                    revision.clone(),
                ));

                let model_path = repo.get(onnx_file).map_err(|e| {
                    ClassifierError::ModelLoadFailed(format!("{}: {}", onnx_file, e))
                })?;
                let preprocessor_path = repo.get(preprocessor_file).map_err(|e| {
                    ClassifierError::ModelLoadFailed(format!("{}: {}", preprocessor_file, e))
                })?;

                Ok((model_path, preprocessor_path))
            }
            ModelSource::Local {
                model_dir,
                onnx_file,
                preprocessor_file,
            } => {
                let model_path = model_dir.join(onnx_file);
                let preprocessor_path = model_dir.join(preprocessor_file);

                for path in [&model_path, &preprocessor_path] {
                    if !path.exists() {
                        return Err(ClassifierError::ModelLoadFailed(format!(
                            "model file not found: {}",
                            path.display()
                        )));
                    }
                }

                Ok((model_path, preprocessor_path))
            }
        }
    }
}

impl ClassifierLoader for OnnxClassifierLoader {
    fn load(&self) -> Result<Arc<dyn EmotionClassifier>, ClassifierError> {
        let (model_path, preprocessor_path) = self.resolve_files()?;
        let classifier =
            OnnxEmotionClassifier::from_files(&model_path, &preprocessor_path, &self.io_names)?;
        Ok(Arc::new(classifier))
    }
}
