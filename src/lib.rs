pub mod config;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod noise;
pub mod resample;
pub mod wav;

pub use error::{PrepError, Result};
