use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid brightness multiplier: {0}")]
    InvalidBrightness(f32),

    #[error("Unknown white balance method: {0} (expected gray_world, max_white or off)")]
    UnknownWhiteBalance(String),

    #[error("Unknown preset: {0} (expected plain, bright, improved or white-balanced)")]
    UnknownPreset(String),

    #[error("Invalid CFA layout: {0}")]
    InvalidCfaLayout(String),

    #[error("Image encoder not available: {0}")]
    EncoderUnavailable(String),

    #[error("Sample stream truncated: {0} bytes is not a whole number of 16-bit samples")]
    TruncatedSample(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
