//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline.

pub mod error;
pub mod warning;

pub use error::{ConversionError, Result};
pub use warning::{PipelineWarning, SizeMismatch};
