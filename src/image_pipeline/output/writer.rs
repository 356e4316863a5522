use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::Rgb8Image;

/// Encodes the final 8-bit image into a raster file format.
pub trait ImageEncoder {
    /// Human-readable encoder name, used in log and warning messages.
    fn name(&self) -> &'static str;

    /// File extension (without the dot) for files this encoder writes.
    fn extension(&self) -> &'static str;

    /// Whether the encoder can run in this build.
    fn is_available(&self) -> bool {
        true
    }

    fn encode(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()>;
}
