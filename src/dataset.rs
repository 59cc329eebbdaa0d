//! Batch conversion of a per-word directory tree into train/test data files.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::PrepConfig;
use crate::convert::convert_wav_file;
use crate::error::{PrepError, Result};
use crate::noise::generate_noise_examples;

/// Pseudo-label directory holding long background recordings.
pub const BACKGROUND_NOISE_DIR: &str = "_background_noise_";

/// Per-directory conversion settings shared by every label in a run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub recordings_per_subfolder: usize,
    pub target_fs: f64,
    pub frame_size: usize,
    /// When set, outputs with a different sample count are deleted and
    /// logged as skipped.
    pub match_len: Option<usize>,
}

/// Train/test example counts for one label.
#[derive(Debug, Clone)]
pub struct WordCounts {
    pub word: String,
    pub train: usize,
    pub test: usize,
}

/// Totals for a completed run.
#[derive(Debug, Default)]
pub struct PrepReport {
    pub per_word: Vec<WordCounts>,
    pub noise_train: usize,
    pub noise_test: usize,
}

/// Numbered subfolder for the `index`-th output file, bounding each
/// directory to `per_subfolder` files.
pub(crate) fn subfolder_path(base: &Path, index: usize, per_subfolder: usize) -> PathBuf {
    base.join((index / per_subfolder).to_string())
}

/// All .wav files directly under `dir`, sorted by name.
pub fn wav_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(PrepError::Precondition(format!(
            "cannot find any .wav files in {}",
            dir.display()
        )));
    }
    Ok(paths)
}

/// Convert every .wav under `input_dir`, optionally holding out a random
/// `test_split` fraction into `test_output_dir`.
///
/// Returns the number of (train, test) examples actually produced; files
/// skipped by the `match_len` filter are not counted.
pub fn convert_wav_files_in_dir<R: Rng>(
    input_dir: &Path,
    output_dir: &Path,
    test_split: Option<f64>,
    test_output_dir: Option<&Path>,
    opts: &ConvertOptions,
    rng: &mut R,
) -> Result<(usize, usize)> {
    if output_dir.is_file() {
        return Err(PrepError::Precondition(format!(
            "output path {} exists and is not a directory",
            output_dir.display()
        )));
    }
    fs::create_dir_all(output_dir)?;

    let test_dir = match test_split {
        None => None,
        Some(split) => {
            if !(split > 0.0 && split < 1.0) {
                return Err(PrepError::Validation(format!(
                    "test_split must be strictly between 0 and 1, got {split}"
                )));
            }
            let dir = test_output_dir.ok_or_else(|| {
                PrepError::Precondition(
                    "test output directory must be given when test_split is set".to_string(),
                )
            })?;
            fs::create_dir_all(dir)?;
            Some(dir)
        }
    };

    let mut wav_paths = wav_files_in(input_dir)?;

    let (train_paths, test_paths) = match test_split {
        None => (wav_paths, Vec::new()),
        Some(split) => {
            wav_paths.shuffle(rng);
            let num_train = ((1.0 - split) * wav_paths.len() as f64).round() as usize;
            let test_paths = wav_paths.split_off(num_train);
            (wav_paths, test_paths)
        }
    };

    let num_train = convert_split(&train_paths, output_dir, opts)?;
    let num_test = match test_dir {
        Some(dir) => convert_split(&test_paths, dir, opts)?,
        None => 0,
    };
    Ok((num_train, num_test))
}

fn convert_split(paths: &[PathBuf], out_base: &Path, opts: &ConvertOptions) -> Result<usize> {
    let mut produced = 0usize;
    for in_path in paths {
        let subfolder = subfolder_path(out_base, produced, opts.recordings_per_subfolder);
        fs::create_dir_all(&subfolder)?;
        let out_path = subfolder.join(format!("{produced:05}.dat"));

        let written = convert_wav_file(in_path, opts.target_fs, opts.frame_size, &out_path)?;
        if let Some(expected) = opts.match_len {
            if written != expected {
                warn!(
                    "skipped {} due to length mismatch ({written} != {expected})",
                    in_path.display()
                );
                fs::remove_file(&out_path)?;
                continue;
            }
        }
        produced += 1;
    }
    Ok(produced)
}

/// Run a full preparation pass: convert every word directory into
/// `<output>/<train|test>/<word>/...` and, when requested, extract
/// background-noise examples in proportion to the average word volume.
///
/// Refuses to run when the train or test output directory already exists,
/// so a crashed run never gets silently mixed with a fresh one.
pub fn prepare(config: &PrepConfig) -> Result<PrepReport> {
    if !config.input_dir.is_dir() {
        return Err(PrepError::Precondition(format!(
            "input path {} is not a directory",
            config.input_dir.display()
        )));
    }
    for word in &config.words {
        let word_dir = config.input_dir.join(word);
        if !word_dir.is_dir() {
            return Err(PrepError::Precondition(format!(
                "missing word directory: {}",
                word_dir.display()
            )));
        }
    }

    fs::create_dir_all(&config.output_dir)?;
    let train_base = config.output_dir.join("train");
    let test_base = config.output_dir.join("test");
    if train_base.exists() || test_base.exists() {
        return Err(PrepError::Precondition(format!(
            "train or test subdirectory already exists under {}; \
             remove stale output before rerunning",
            config.output_dir.display()
        )));
    }
    fs::create_dir_all(&train_base)?;
    fs::create_dir_all(&test_base)?;

    info!("using test split: {}", config.test_split);
    info!("number of words: {}", config.words.len());

    let opts = ConvertOptions {
        recordings_per_subfolder: config.recordings_per_subfolder,
        target_fs: config.target_fs,
        frame_size: config.frame_size,
        match_len: Some(config.match_len),
    };
    let mut rng = config.rng();

    let mut report = PrepReport::default();
    for word in &config.words {
        let (train, test) = convert_wav_files_in_dir(
            &config.input_dir.join(word),
            &train_base.join(word),
            Some(config.test_split),
            Some(&test_base.join(word)),
            &opts,
            &mut rng,
        )?;
        info!("{word}: {train} train / {test} test examples");
        report.per_word.push(WordCounts {
            word: word.clone(),
            train,
            test,
        });
    }

    if config.include_noise {
        let noise_in_dir = config.input_dir.join(BACKGROUND_NOISE_DIR);
        if !noise_in_dir.is_dir() {
            return Err(PrepError::Precondition(format!(
                "missing background noise directory: {}",
                noise_in_dir.display()
            )));
        }
        let noise_wavs = wav_files_in(&noise_in_dir)?;

        // Noise volume tracks the average per-word example count, spread
        // evenly across the available recordings.
        let num_words = report.per_word.len();
        let mean = |total: usize| (total as f64 / num_words as f64).round() as usize;
        let train_total: usize = report.per_word.iter().map(|w| w.train).sum();
        let test_total: usize = report.per_word.iter().map(|w| w.test).sum();
        let per_recording_train = mean(train_total) / noise_wavs.len();
        let per_recording_test = mean(test_total) / noise_wavs.len();
        info!(
            "noise examples per recording: {per_recording_train} train / {per_recording_test} test"
        );

        for (split, per_recording) in [("train", per_recording_train), ("test", per_recording_test)]
        {
            let out_dir = config.output_dir.join(split).join(BACKGROUND_NOISE_DIR);
            let mut begin_index = 0usize;
            for noise_wav in &noise_wavs {
                generate_noise_examples(
                    noise_wav,
                    per_recording,
                    opts.recordings_per_subfolder,
                    config.target_fs,
                    config.match_len,
                    &out_dir,
                    begin_index,
                    &mut rng,
                )?;
                begin_index += per_recording;
            }
            match split {
                "train" => report.noise_train = begin_index,
                _ => report.noise_test = begin_index,
            }
        }
    }

    Ok(report)
}
