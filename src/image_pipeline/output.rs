//! Output module
//!
//! Image encoders for the converted frame, plus the raw array fallback used
//! when the configured encoder is not available.

mod npy_writer;
mod png_encoder;
mod tiff_encoder;
pub mod types;
mod writer;

pub use npy_writer::NpyArrayWriter;
pub use png_encoder::PngEncoder;
pub use tiff_encoder::TiffEncoder;
pub use types::{OutputKind, TiffCompression, WrittenOutput};
pub use writer::ImageEncoder;
