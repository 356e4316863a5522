//! Raw array fallback in NumPy `.npy` format.
//!
//! Used when no image encoder is available, so the converted pixels are
//! still persisted and can be loaded with `numpy.load`.

use std::io::Write;

use ndarray_npy::WriteNpyExt;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::Rgb8Image;

#[derive(Debug, Clone, Copy, Default)]
pub struct NpyArrayWriter;

impl NpyArrayWriter {
    pub fn name(&self) -> &'static str {
        "NumPy"
    }

    pub fn extension(&self) -> &'static str {
        "npy"
    }

    /// Writes the `height x width x 3` u8 array, C order.
    pub fn write_array(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()> {
        debug!("Writing raw array: {}x{}x3 u8", image.height(), image.width());

        image
            .data
            .as_standard_layout()
            .write_npy(&mut *output)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))
    }
}
