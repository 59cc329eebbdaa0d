//! Loading .wav recordings as normalized float samples.

use std::path::Path;

use crate::error::{PrepError, Result};

/// Read a wav file as a float waveform.
///
/// Only mono 16-bit integer PCM is accepted; anything else is an error.
/// Samples are scaled by 1/32768 so the result lies in [-1.0, 1.0].
///
/// Returns the sampling frequency in Hz and the samples.
pub fn read_as_floats(wav_path: &Path) -> Result<(u32, Vec<f32>)> {
    let mut reader = hound::WavReader::open(wav_path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(PrepError::Validation(format!(
            "{}: expected mono audio, got {} channels",
            wav_path.display(),
            spec.channels
        )));
    }
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(PrepError::Validation(format!(
            "{}: expected 16-bit integer PCM, got {}-bit {:?}",
            wav_path.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .map(|s| Ok(s? as f32 / 32768.0))
        .collect::<Result<Vec<f32>>>()?;

    Ok((spec.sample_rate, samples))
}
