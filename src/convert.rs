//! Single-file conversion: wav in, raw little-endian f32 samples out.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{PrepError, Result};
use crate::resample::{resample_to, resampled_len};
use crate::wav::read_as_floats;

/// Truncate `signal` to a whole number of frames of `frame_size` samples.
///
/// Errors when the signal is shorter than one frame.
pub fn truncate_to_frames(
    mut signal: Vec<f32>,
    frame_size: usize,
    source: &Path,
) -> Result<Vec<f32>> {
    let num_frames = signal.len() / frame_size;
    if num_frames == 0 {
        return Err(PrepError::Processing(format!(
            "{}: signal would be 0 samples long after truncation to {}-sample frames",
            source.display(),
            frame_size
        )));
    }
    signal.truncate(num_frames * frame_size);
    Ok(signal)
}

/// Load a wav file, resample it to `target_fs` and truncate it to an
/// integer multiple of `frame_size` samples.
pub fn load_waveform(wav_path: &Path, target_fs: f64, frame_size: usize) -> Result<Vec<f32>> {
    let (fs, signal) = read_as_floats(wav_path)?;
    let target_len = resampled_len(signal.len(), fs as f64, target_fs);
    let resampled = resample_to(&signal, target_len);
    truncate_to_frames(resampled, frame_size, wav_path)
}

/// Convert one wav file into a raw data file of little-endian f32 samples.
///
/// Returns the number of samples written, so callers can enforce a fixed
/// expected length.
pub fn convert_wav_file(
    in_wav_path: &Path,
    target_fs: f64,
    frame_size: usize,
    out_data_path: &Path,
) -> Result<usize> {
    let waveform = load_waveform(in_wav_path, target_fs, frame_size)?;
    write_raw_f32(out_data_path, &waveform)?;
    Ok(waveform.len())
}

/// Serialize samples as raw little-endian IEEE 754 f32, no header.
pub fn write_raw_f32(path: &Path, samples: &[f32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for &sample in samples {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read back a raw little-endian f32 data file.
pub fn read_raw_f32(path: &Path) -> Result<Vec<f32>> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    if bytes.len() % 4 != 0 {
        return Err(PrepError::Validation(format!(
            "{}: file size {} is not a multiple of 4 bytes",
            path.display(),
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
