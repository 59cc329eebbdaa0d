use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use speech_prep::config::{parse_words, PrepConfig};
use speech_prep::dataset;

#[derive(Parser)]
#[command(name = "speech-prep")]
#[command(about = "Prepare speech-command .wav recordings as raw float training data")]
struct Args {
    /// Directory with one subdirectory of .wav recordings per word
    input_wav_path: PathBuf,

    /// Directory the converted train/test data is written into
    output_data_path: PathBuf,

    /// Words to convert (comma-separated); each needs a matching input subdirectory
    #[arg(long)]
    words: Option<String>,

    /// Also extract background-noise examples from <input>/_background_noise_
    #[arg(long)]
    include_noise: bool,

    /// Fraction of recordings per word held out as test data (strictly between 0 and 1)
    #[arg(long, default_value = "0.15")]
    test_split: f64,

    /// Target sampling frequency in Hz for the output data
    #[arg(long, default_value = "44100")]
    target_fs: f64,

    /// Frame size in samples at the target frequency
    #[arg(long, default_value = "1024")]
    frame_size: usize,

    /// Maximum number of .dat files per numbered subfolder
    #[arg(long, default_value = "500")]
    recordings_per_subfolder: usize,

    /// Keep only recordings with exactly this many output samples
    #[arg(long, default_value = "44032")]
    match_len: usize,

    /// RNG seed for reproducible splits and noise offsets
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = PrepConfig {
        input_dir: args.input_wav_path,
        output_dir: args.output_data_path,
        words: args.words.as_deref().map(parse_words).unwrap_or_default(),
        include_noise: args.include_noise,
        test_split: args.test_split,
        target_fs: args.target_fs,
        frame_size: args.frame_size,
        recordings_per_subfolder: args.recordings_per_subfolder,
        match_len: args.match_len,
        seed: args.seed,
    };

    if let Err(e) = run(&config) {
        error!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(config: &PrepConfig) -> speech_prep::Result<()> {
    config.validate()?;

    info!("🎙️ Preparing {} words", config.words.len());
    let report = dataset::prepare(config)?;

    let train_total: usize = report.per_word.iter().map(|w| w.train).sum();
    let test_total: usize = report.per_word.iter().map(|w| w.test).sum();
    info!(
        "✅ Done: {train_total} train / {test_total} test word examples, \
         {} train / {} test noise examples",
        report.noise_train, report.noise_test
    );
    Ok(())
}
