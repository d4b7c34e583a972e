use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioNormalizer, AudioNormalizerError};
use crate::domain::{TARGET_SAMPLE_RATE, Waveform};

const RESAMPLE_CHUNK_SIZE: usize = 1024;

/// Decodes any container symphonia can probe, downmixes to mono and resamples to 16 kHz.
pub struct SymphoniaAudioNormalizer;

impl AudioNormalizer for SymphoniaAudioNormalizer {
    fn normalize(&self, path: &Path) -> Result<Waveform, AudioNormalizerError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let decoded = decode_interleaved(mss, &hint)?;
        let mono = downmix_to_mono(&decoded.samples, decoded.channels);

        if mono.is_empty() {
            return Err(AudioNormalizerError::DecodingFailed(
                "no audio samples decoded".to_string(),
            ));
        }

        let samples = if decoded.sample_rate != TARGET_SAMPLE_RATE {
            resample(&mono, decoded.sample_rate, TARGET_SAMPLE_RATE)?
        } else {
            mono
        };

        let waveform = Waveform::from_mono_16k(samples);

        tracing::debug!(
            source_rate = decoded.sample_rate,
            source_channels = decoded.channels,
            samples = waveform.len(),
            duration_secs = waveform.duration_secs(),
            "Audio normalized to 16kHz mono"
        );

        Ok(waveform)
    }
}

struct DecodedAudio {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

fn decode_interleaved(
    mss: MediaSourceStream,
    hint: &Hint,
) -> Result<DecodedAudio, AudioNormalizerError> {
    let probed = symphonia::default::get_probe()
        .format(
            hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioNormalizerError::DecodingFailed(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| AudioNormalizerError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| AudioNormalizerError::DecodingFailed("unknown sample rate".to_string()))?;
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioNormalizerError::DecodingFailed(format!("codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(AudioNormalizerError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(AudioNormalizerError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }

        // Containers may omit the channel layout; trust the decoded buffer.
        channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    Ok(DecodedAudio {
        samples,
        channels,
        sample_rate,
    })
}

/// Averages interleaved frames across channels. Mono input is returned as is.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Sinc resampling of a mono signal. Output length is `len * to / from`, rounded down.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioNormalizerError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    if from_rate == 0 {
        return Err(AudioNormalizerError::ResamplingFailed(
            "source sample rate is zero".to_string(),
        ));
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLE_CHUNK_SIZE, 1)
        .map_err(|e| AudioNormalizerError::ResamplingFailed(format!("init: {}", e)))?;

    // The sinc filter delays its output; feed silence until the tail is flushed.
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected_len + delay + RESAMPLE_CHUNK_SIZE);
    let mut input = samples.chunks(RESAMPLE_CHUNK_SIZE);

    while output.len() < expected_len + delay {
        let chunk = match input.next() {
            Some(chunk) if chunk.len() == RESAMPLE_CHUNK_SIZE => chunk.to_vec(),
            Some(chunk) => {
                let mut padded = chunk.to_vec();
                padded.resize(RESAMPLE_CHUNK_SIZE, 0.0);
                padded
            }
            None => vec![0.0; RESAMPLE_CHUNK_SIZE],
        };

        let result = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioNormalizerError::ResamplingFailed(e.to_string()))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    let end = (delay + expected_len).min(output.len());
    Ok(output[delay..end].to_vec())
}
