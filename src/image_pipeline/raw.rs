//! RAW frame reading module
//!
//! This module turns headerless sensor dumps into fixed-size mosaic frames.

mod reader;
mod flat_reader;
pub mod types;

pub use reader::RawFrameReader;
pub use flat_reader::{FlatSampleReader, SampleEndian};
pub use types::{FrameDims, LoadedFrame, RawFrame, SENSOR_BITS, SENSOR_WHITE_LEVEL};
