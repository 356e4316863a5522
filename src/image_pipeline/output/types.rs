//! Output encoding types

use std::path::PathBuf;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// What ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A viewable raster image from the configured encoder.
    Image,
    /// The raw 8-bit array, written because the encoder was unavailable.
    RawArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub path: PathBuf,
    pub kind: OutputKind,
}
