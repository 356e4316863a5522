//! RAW frame data types

use ndarray::ArrayView2;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::warning::SizeMismatch;

/// Nominal bit depth of the sensor samples.
pub const SENSOR_BITS: u32 = 10;

/// Largest value a 10-bit sample can hold; also the tone mapping white point.
pub const SENSOR_WHITE_LEVEL: u16 = (1 << SENSOR_BITS) - 1;

/// Dimensions of the full-resolution mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDims {
    pub width: usize,
    pub height: usize,
}

impl FrameDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of samples a frame of these dimensions holds, `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Shape of each channel plane after 2x2 block extraction.
    /// A trailing odd row or column is dropped.
    pub fn half(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    pub fn is_even(&self) -> bool {
        self.width % 2 == 0 && self.height % 2 == 0
    }
}

impl Default for FrameDims {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Single-channel GRBG sensor frame, exactly `width * height` samples long.
#[derive(Debug, Clone)]
pub struct RawFrame {
    dims: FrameDims,
    data: Vec<u16>,
}

impl RawFrame {
    /// Wraps `data` as a frame; the length must match the dimensions.
    pub fn new(dims: FrameDims, data: Vec<u16>) -> Result<Self> {
        if dims.pixel_count() != Some(data.len()) {
            return Err(ConversionError::InvalidDimensions(dims.width, dims.height));
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> FrameDims {
        self.dims
    }

    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    /// Row-major `height x width` view over the samples, without copying.
    pub fn mosaic(&self) -> Result<ArrayView2<'_, u16>> {
        ArrayView2::from_shape((self.dims.height, self.dims.width), self.data.as_slice())
            .map_err(|_| ConversionError::InvalidDimensions(self.dims.width, self.dims.height))
    }
}

/// Result of loading a frame: the frame itself plus the length mismatch, if any.
#[derive(Debug, Clone)]
pub struct LoadedFrame {
    pub frame: RawFrame,
    pub size_mismatch: Option<SizeMismatch>,
}
