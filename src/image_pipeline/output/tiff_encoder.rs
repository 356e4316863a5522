use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::debayer::Rgb8Image;
use crate::image_pipeline::output::types::TiffCompression;
use crate::image_pipeline::output::writer::ImageEncoder;

/// Lossless RGB8 TIFF output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffEncoder {
    compression: TiffCompression,
}

impl TiffEncoder {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    pub fn compression(&self) -> TiffCompression {
        self.compression
    }
}

impl ImageEncoder for TiffEncoder {
    fn name(&self) -> &'static str {
        "TIFF"
    }

    fn extension(&self) -> &'static str {
        "tiff"
    }

    fn encode(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding TIFF image: {}x{} ({:?})", image.width(), image.height(), self.compression);

        use tiff::encoder::compression::DeflateLevel;
        let compression = match self.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<tiff::encoder::colortype::RGB8>(
            image.width() as u32,
            image.height() as u32,
            &image.to_interleaved(),
        ).map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn decode(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let mut decoder = tiff::decoder::Decoder::new(std::io::Cursor::new(bytes)).unwrap();
        let (width, height) = decoder.dimensions().unwrap();
        match decoder.read_image().unwrap() {
            tiff::decoder::DecodingResult::U8(data) => (width, height, data),
            _ => panic!("expected 8-bit samples"),
        }
    }

    #[test]
    fn test_rgb8_tiff_is_lossless() {
        let image = Rgb8Image {
            data: Array3::from_shape_fn((4, 2, 3), |(r, c, ch)| (r * 50 + c * 7 + ch) as u8),
        };

        for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::DeflateBest] {
            let mut encoded = Vec::new();
            TiffEncoder::new(compression).encode(&image, &mut encoded).unwrap();

            let (width, height, data) = decode(&encoded);
            assert_eq!((width, height), (2, 4));
            assert_eq!(data, image.to_interleaved());
        }
    }
}
