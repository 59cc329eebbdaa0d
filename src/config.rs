use std::collections::HashSet;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{PrepError, Result};

/// Settings for one data preparation run, as collected from the CLI.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub words: Vec<String>,
    pub include_noise: bool,
    /// Fraction of each word's recordings held out for the test set.
    pub test_split: f64,
    /// Target sampling frequency in Hz.
    pub target_fs: f64,
    /// Frame size in samples at the target frequency.
    pub frame_size: usize,
    /// Cap on .dat files per numbered output subfolder.
    pub recordings_per_subfolder: usize,
    /// Converted recordings must have exactly this many samples.
    pub match_len: usize,
    /// Optional RNG seed for reproducible splits and noise offsets.
    pub seed: Option<u64>,
}

impl PrepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.words.is_empty() {
            return Err(PrepError::Validation(
                "missing words argument (use --words word1,word2,...)".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for word in &self.words {
            if !seen.insert(word.as_str()) {
                return Err(PrepError::Validation(format!(
                    "found duplicate word: {word}"
                )));
            }
        }
        if !(self.test_split > 0.0 && self.test_split < 1.0) {
            return Err(PrepError::Validation(format!(
                "test_split must be strictly between 0 and 1, got {}",
                self.test_split
            )));
        }
        if self.target_fs <= 0.0 {
            return Err(PrepError::Validation(format!(
                "target_fs must be positive, got {}",
                self.target_fs
            )));
        }
        if self.frame_size == 0 {
            return Err(PrepError::Validation("frame_size must be positive".to_string()));
        }
        if self.recordings_per_subfolder == 0 {
            return Err(PrepError::Validation(
                "recordings_per_subfolder must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Split a comma-separated word list, trimming whitespace and dropping
/// empty entries. Duplicates are caught by [`PrepConfig::validate`].
pub fn parse_words(words: &str) -> Vec<String> {
    words
        .split(',')
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}
