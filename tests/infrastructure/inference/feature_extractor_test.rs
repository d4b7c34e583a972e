use candle_core::Device;

use moodmix::domain::Waveform;
use moodmix::infrastructure::inference::{
    FeatureExtractor, FeatureExtractorConfig, pad_batch, zero_mean_unit_var,
};

#[test]
fn given_samples_when_normalizing_then_mean_is_zero_and_variance_is_one() {
    let samples: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin() * 0.3 + 0.1).collect();

    let normalized = zero_mean_unit_var(&samples);

    let n = normalized.len() as f32;
    let mean = normalized.iter().sum::<f32>() / n;
    let variance = normalized.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    assert!(mean.abs() < 1e-4);
    assert!((variance - 1.0).abs() < 1e-3);
}

#[test]
fn given_silence_when_normalizing_then_output_stays_finite() {
    let normalized = zero_mean_unit_var(&[0.0; 64]);
    assert!(normalized.iter().all(|x| x.is_finite() && *x == 0.0));
}

#[test]
fn given_rows_of_different_lengths_when_padding_then_pads_to_longest_with_mask() {
    let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0]];

    let (values, mask, max_len) = pad_batch(&rows, -1.0);

    assert_eq!(max_len, 3);
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, -1.0, -1.0]);
    assert_eq!(mask, vec![1, 1, 1, 1, 0, 0]);
}

#[test]
fn given_single_row_when_padding_then_batch_pads_to_itself() {
    let rows = vec![vec![0.5; 10]];

    let (values, mask, max_len) = pad_batch(&rows, 0.0);

    assert_eq!(max_len, 10);
    assert_eq!(values, rows[0]);
    assert!(mask.iter().all(|m| *m == 1));
}

#[test]
fn given_single_waveform_when_extracting_then_tensor_shape_is_one_by_length() {
    let extractor = FeatureExtractor::new(FeatureExtractorConfig::default());
    let waveform = Waveform::from_mono_16k(vec![0.2; 320]);

    let features = extractor.extract(&[&waveform], &Device::Cpu).unwrap();

    assert_eq!(features.input_values.dims(), &[1, 320]);
    let mask = features.attention_mask.unwrap();
    assert_eq!(mask.dims(), &[1, 320]);
}

#[test]
fn given_normalization_disabled_when_extracting_then_values_are_unchanged() {
    let extractor = FeatureExtractor::new(FeatureExtractorConfig {
        do_normalize: false,
        return_attention_mask: false,
        ..FeatureExtractorConfig::default()
    });
    let waveform = Waveform::from_mono_16k(vec![0.25, -0.25]);

    let features = extractor.extract(&[&waveform], &Device::Cpu).unwrap();

    let values: Vec<Vec<f32>> = features.input_values.to_vec2().unwrap();
    assert_eq!(values, vec![vec![0.25, -0.25]]);
    assert!(features.attention_mask.is_none());
}

#[test]
fn given_empty_batch_when_extracting_then_returns_error() {
    let extractor = FeatureExtractor::new(FeatureExtractorConfig::default());
    assert!(extractor.extract(&[], &Device::Cpu).is_err());
}

#[test]
fn given_preprocessor_config_file_when_loading_then_reads_known_fields() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("preprocessor_config.json");
    std::fs::write(
        &path,
        r#"{
            "do_normalize": true,
            "feature_extractor_type": "Wav2Vec2FeatureExtractor",
            "feature_size": 1,
            "padding_side": "right",
            "padding_value": 0,
            "return_attention_mask": true,
            "sampling_rate": 16000
        }"#,
    )
    .unwrap();

    let extractor = FeatureExtractor::from_file(&path).unwrap();

    assert_eq!(extractor.config().sampling_rate, 16_000);
    assert!(extractor.config().do_normalize);
    assert!(extractor.config().return_attention_mask);
}
