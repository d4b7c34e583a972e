use std::path::Path;

use candle_core::{Device, Tensor};
use serde::Deserialize;

use crate::application::ports::ClassifierError;
use crate::domain::{TARGET_SAMPLE_RATE, Waveform};

const NORMALIZATION_EPSILON: f32 = 1e-7;

/// Subset of a Hugging Face `preprocessor_config.json` for raw-waveform extractors.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureExtractorConfig {
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,
    #[serde(default = "default_do_normalize")]
    pub do_normalize: bool,
    #[serde(default)]
    pub padding_value: f32,
    #[serde(default)]
    pub return_attention_mask: bool,
}

fn default_sampling_rate() -> u32 {
    TARGET_SAMPLE_RATE
}

fn default_do_normalize() -> bool {
    true
}

impl Default for FeatureExtractorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: TARGET_SAMPLE_RATE,
            do_normalize: true,
            padding_value: 0.0,
            return_attention_mask: true,
        }
    }
}

/// Model inputs for a padded batch of waveforms.
#[derive(Debug)]
pub struct BatchFeatures {
    /// `(batch, max_len)` f32 samples.
    pub input_values: Tensor,
    /// `(batch, max_len)` i64, 1 for real samples and 0 for padding.
    pub attention_mask: Option<Tensor>,
}

/// Turns raw 16 kHz waveforms into the input tensors of a wav2vec2-style model.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: FeatureExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureExtractorConfig) -> Self {
        Self { config }
    }

    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::ModelLoadFailed(format!("read preprocessor config: {}", e))
        })?;
        let config: FeatureExtractorConfig = serde_json::from_str(&contents).map_err(|e| {
            ClassifierError::ModelLoadFailed(format!("parse preprocessor config: {}", e))
        })?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &FeatureExtractorConfig {
        &self.config
    }

    /// Normalizes each waveform and pads the batch to its longest member.
    /// A batch of one pads to itself.
    pub fn extract(
        &self,
        batch: &[&Waveform],
        device: &Device,
    ) -> Result<BatchFeatures, ClassifierError> {
        if batch.is_empty() {
            return Err(ClassifierError::InferenceFailed("empty batch".to_string()));
        }

        for waveform in batch {
            if waveform.sample_rate() != self.config.sampling_rate {
                return Err(ClassifierError::InferenceFailed(format!(
                    "extractor expects {} Hz audio, got {} Hz",
                    self.config.sampling_rate,
                    waveform.sample_rate()
                )));
            }
        }

        let rows: Vec<Vec<f32>> = batch
            .iter()
            .map(|w| {
                if self.config.do_normalize {
                    zero_mean_unit_var(w.samples())
                } else {
                    w.samples().to_vec()
                }
            })
            .collect();

        let (values, mask, max_len) = pad_batch(&rows, self.config.padding_value);
        let batch_size = rows.len();

        let input_values = Tensor::from_vec(values, (batch_size, max_len), device)
            .map_err(|e| ClassifierError::InferenceFailed(format!("input tensor: {}", e)))?;

        let attention_mask = if self.config.return_attention_mask {
            Some(
                Tensor::from_vec(mask, (batch_size, max_len), device).map_err(|e| {
                    ClassifierError::InferenceFailed(format!("attention mask: {}", e))
                })?,
            )
        } else {
            None
        };

        Ok(BatchFeatures {
            input_values,
            attention_mask,
        })
    }
}

/// Shifts samples to zero mean and scales them to unit variance.
pub fn zero_mean_unit_var(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let n = samples.len() as f32;
    let mean = samples.iter().sum::<f32>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    let std = (variance + NORMALIZATION_EPSILON).sqrt();

    samples.iter().map(|x| (x - mean) / std).collect()
}

/// Right-pads rows to the longest one. Returns flattened values, the flattened
/// attention mask and the padded row length.
pub fn pad_batch(rows: &[Vec<f32>], padding_value: f32) -> (Vec<f32>, Vec<i64>, usize) {
    let max_len = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut values = Vec::with_capacity(rows.len() * max_len);
    let mut mask = Vec::with_capacity(rows.len() * max_len);

    for row in rows {
        let pad_len = max_len - row.len();

        values.extend_from_slice(row);
        values.extend(std::iter::repeat_n(padding_value, pad_len));

        mask.extend(std::iter::repeat_n(1i64, row.len()));
        mask.extend(std::iter::repeat_n(0i64, pad_len));
    }

    (values, mask, max_len)
}
