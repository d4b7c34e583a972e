mod feature_extractor;
mod onnx_emotion_classifier;

pub use feature_extractor::{
    BatchFeatures, FeatureExtractor, FeatureExtractorConfig, pad_batch, zero_mean_unit_var,
};
pub use onnx_emotion_classifier::{
    ModelIoNames, ModelSource, OnnxClassifierLoader, OnnxEmotionClassifier, argmax,
};
