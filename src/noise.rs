//! Extraction of fixed-length background-noise examples from long
//! recordings.

use std::fs;
use std::path::Path;

use log::info;
use rand::Rng;

use crate::convert::write_raw_f32;
use crate::dataset::subfolder_path;
use crate::error::{PrepError, Result};
use crate::resample::resample_to;
use crate::wav::read_as_floats;

/// Cut `num_examples` random windows out of one long noise recording and
/// write each as a raw f32 data file of exactly `sample_length` samples.
///
/// The window is cut at the recording's own rate using the length that
/// resamples to `sample_length`, so every output matches the word examples
/// sample for sample. Files are named `NNNNN.dat` starting at
/// `file_begin_index` and distributed across numbered subfolders of at most
/// `recordings_per_subfolder` files.
#[allow(clippy::too_many_arguments)]
pub fn generate_noise_examples<R: Rng>(
    noise_wav_path: &Path,
    num_examples: usize,
    recordings_per_subfolder: usize,
    target_fs: f64,
    sample_length: usize,
    out_dir: &Path,
    file_begin_index: usize,
    rng: &mut R,
) -> Result<usize> {
    info!(
        "reading {} ({num_examples} noise examples)",
        noise_wav_path.display()
    );
    let (fs, signal) = read_as_floats(noise_wav_path)?;

    let window_len = (sample_length as f64 * fs as f64 / target_fs).ceil() as usize;
    if signal.len() <= window_len {
        return Err(PrepError::Precondition(format!(
            "{}: recording too short for {sample_length}-sample noise examples \
             ({} <= {window_len} source samples)",
            noise_wav_path.display(),
            signal.len()
        )));
    }
    let max_begin = signal.len() - window_len;

    for i in 0..num_examples {
        let begin = rng.gen_range(0..max_begin);
        let window = &signal[begin..begin + window_len];
        let resampled = resample_to(window, sample_length);

        let file_index = file_begin_index + i;
        let subfolder = subfolder_path(out_dir, file_index, recordings_per_subfolder);
        fs::create_dir_all(&subfolder)?;
        write_raw_f32(&subfolder.join(format!("{file_index:05}.dat")), &resampled)?;
    }
    Ok(num_examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::read_raw_f32;
    use crate::test_support::write_wav_i16;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn noise_examples_have_the_requested_length() {
        let tmp = tempfile::tempdir().unwrap();
        let noise_path = tmp.path().join("hum.wav");
        write_wav_i16(&noise_path, 44100, &vec![50i16; 20_000]);
        let out_dir = tmp.path().join("noise");

        let written = generate_noise_examples(
            &noise_path,
            5,
            2,
            44100.0,
            4096,
            &out_dir,
            0,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        assert_eq!(5, written);

        // 2 per subfolder: 00000/00001 in 0, 00002/00003 in 1, 00004 in 2.
        for (subfolder, name) in [(0, 0), (0, 1), (1, 2), (1, 3), (2, 4)] {
            let path = out_dir
                .join(subfolder.to_string())
                .join(format!("{name:05}.dat"));
            let samples = read_raw_f32(&path).unwrap();
            assert_eq!(4096, samples.len(), "{}", path.display());
        }
    }

    #[test]
    fn begin_index_offsets_file_names() {
        let tmp = tempfile::tempdir().unwrap();
        let noise_path = tmp.path().join("hum.wav");
        write_wav_i16(&noise_path, 44100, &vec![50i16; 20_000]);
        let out_dir = tmp.path().join("noise");

        generate_noise_examples(
            &noise_path,
            2,
            500,
            44100.0,
            1024,
            &out_dir,
            7,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        assert!(out_dir.join("0").join("00007.dat").exists());
        assert!(out_dir.join("0").join("00008.dat").exists());
    }

    #[test]
    fn short_recordings_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let noise_path = tmp.path().join("blip.wav");
        write_wav_i16(&noise_path, 44100, &vec![50i16; 1000]);

        let err = generate_noise_examples(
            &noise_path,
            1,
            500,
            44100.0,
            4096,
            &tmp.path().join("noise"),
            0,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap_err();
        match err {
            PrepError::Precondition(msg) => assert!(msg.contains("too short")),
            other => panic!("expected precondition error, got {:?}", other),
        }
    }

    #[test]
    fn window_length_accounts_for_resampling() {
        // 22050 Hz source, 44100 Hz target: a 2048-sample output needs a
        // 1024-sample source window, so a 1030-sample recording is enough.
        let tmp = tempfile::tempdir().unwrap();
        let noise_path = tmp.path().join("hum.wav");
        write_wav_i16(&noise_path, 22050, &vec![50i16; 1030]);
        let out_dir = tmp.path().join("noise");

        generate_noise_examples(
            &noise_path,
            1,
            500,
            44100.0,
            2048,
            &out_dir,
            0,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
        let samples = read_raw_f32(&out_dir.join("0").join("00000.dat")).unwrap();
        assert_eq!(2048, samples.len());
    }
}
