use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Error, Debug)]
pub enum PrepError {
    /// A required input/output directory is missing, already populated, or
    /// an input recording is unusable for the requested operation.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Malformed arguments or audio format (channel count, sample width,
    /// split fraction, duplicate words).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Signal processing failed (e.g. nothing left after frame truncation).
    #[error("Processing error: {0}")]
    Processing(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
