//! Pipeline conversions module
//!
//! This module contains orchestration logic: the configurable RAW to RGB
//! pipeline and the standalone gain estimator.

pub mod config;
mod gain_estimate;
mod raw_to_rgb;
mod timing;

#[cfg(test)]
mod tests;

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_HEIGHT, DEFAULT_WIDTH, Preset};
pub use gain_estimate::{DEFAULT_WB_SCRIPT, GainEstimate, GainEstimator};
pub use raw_to_rgb::{Conversion, ConversionReport, RawToRgbPipeline};
pub use timing::{PipelineTimings, StepTiming, Timer};
