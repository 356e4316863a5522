//! PNG output through the `image` crate.
//!
//! The encoder is compiled in with the `png` feature. Without it the type
//! still exists but reports itself unavailable, and the pipeline falls back
//! to raw array output.

use std::io::Write;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::Rgb8Image;
use crate::image_pipeline::output::writer::ImageEncoder;

#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

#[cfg(feature = "png")]
impl ImageEncoder for PngEncoder {
    fn name(&self) -> &'static str {
        "PNG"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()> {
        use image::ImageEncoder as _;

        tracing::debug!("Encoding PNG image: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buffer)
            .write_image(
                &image.to_interleaved(),
                image.width() as u32,
                image.height() as u32,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        tracing::debug!("PNG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

#[cfg(not(feature = "png"))]
impl ImageEncoder for PngEncoder {
    fn name(&self) -> &'static str {
        "PNG"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn is_available(&self) -> bool {
        false
    }

    #[allow(unused)]
    fn encode(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()> {
        Err(ConversionError::EncoderUnavailable(
            "PNG support was not compiled in (enable the `png` feature)".to_string(),
        ))
    }
}

#[cfg(all(test, feature = "png"))]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_png_round_trips_through_decoder() {
        let image = Rgb8Image {
            data: Array3::from_shape_fn((2, 3, 3), |(r, c, ch)| (r * 60 + c * 20 + ch) as u8),
        };
        let mut encoded = Vec::new();
        PngEncoder.encode(&image, &mut encoded).unwrap();

        assert_eq!(&encoded[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory_with_format(&encoded, image::ImageFormat::Png)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), image.to_interleaved());
    }
}
