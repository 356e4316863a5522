//! Reader for headerless sensor dumps.
//!
//! The capture tool writes one frame as a flat run of 16-bit words, row-major,
//! with the 10-bit sample in the low bits of each word. There is no header, so
//! the caller supplies the dimensions and the reader reconciles the length.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::warning::{PipelineWarning, SizeMismatch};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{FrameDims, LoadedFrame, RawFrame, SENSOR_WHITE_LEVEL};

/// Byte order of the 16-bit words in the dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleEndian {
    #[default]
    Little,
    Big,
}

/// Reads flat 16-bit sample files, zero-padding or truncating to the expected size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSampleReader {
    order: SampleEndian,
}

impl FlatSampleReader {
    pub fn new(order: SampleEndian) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SampleEndian {
        self.order
    }

    fn decode_samples(&self, data: &[u8]) -> Result<Vec<u16>> {
        if data.len() % 2 != 0 {
            return Err(ConversionError::TruncatedSample(data.len()));
        }
        let mut samples = vec![0u16; data.len() / 2];
        match self.order {
            SampleEndian::Little => LittleEndian::read_u16_into(data, &mut samples),
            SampleEndian::Big => BigEndian::read_u16_into(data, &mut samples),
        }
        Ok(samples)
    }
}

impl RawFrameReader for FlatSampleReader {
    /// Decodes `data` into a frame of exactly `dims.pixel_count()` samples.
    ///
    /// A short input is zero-padded at the end and a long one is truncated;
    /// either way a [`SizeMismatch`] is logged once and returned with the frame.
    fn read_frame(&self, data: &[u8], dims: FrameDims) -> Result<LoadedFrame> {
        debug!("Decoding flat sample stream, {} bytes", data.len());

        let expected = dims
            .pixel_count()
            .ok_or(ConversionError::InvalidDimensions(dims.width, dims.height))?;
        let mut samples = self.decode_samples(data)?;
        let actual = samples.len();

        debug!("Expected pixels: {}, actual pixels: {}", expected, actual);

        let size_mismatch = if actual != expected {
            let mismatch = SizeMismatch { expected, actual };
            warn!("{}", PipelineWarning::SizeMismatch(mismatch));
            samples.resize(expected, 0);
            Some(mismatch)
        } else {
            None
        };

        let max_sample = samples.iter().copied().max().unwrap_or(0);
        if max_sample > SENSOR_WHITE_LEVEL {
            debug!(
                "Sample maximum {} exceeds the {}-level white point, highlights will saturate",
                max_sample, SENSOR_WHITE_LEVEL
            );
        } else {
            debug!("Sample maximum: {}", max_sample);
        }

        Ok(LoadedFrame {
            frame: RawFrame::new(dims, samples)?,
            size_mismatch,
        })
    }
}
