/// Sample rate every waveform is normalized to before classification.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM samples at [`TARGET_SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
}

impl Waveform {
    /// Wraps samples that are already mono and at 16 kHz.
    pub fn from_mono_16k(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        TARGET_SAMPLE_RATE
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / TARGET_SAMPLE_RATE as f32
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
