//! Image processing pipeline module
//!
//! Turns raw 10-bit GRBG sensor dumps into 8-bit RGB previews. Submodules
//! cover frame loading, channel extraction, color correction, output
//! encoding and the orchestrating pipelines.

pub mod raw;
pub mod debayer;
pub mod color;
pub mod output;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    PipelineWarning,
    Result,
    SizeMismatch,
};

pub use raw::{
    FlatSampleReader,
    FrameDims,
    LoadedFrame,
    RawFrame,
    RawFrameReader,
    SampleEndian,
};

pub use debayer::{
    BlockDebayer,
    CfaLayout,
    LinearRgb,
    Rgb8Image,
};

pub use color::{
    ChannelStats,
    GainTriple,
    WhiteBalanceMethod,
};

pub use output::{
    ImageEncoder,
    NpyArrayWriter,
    OutputKind,
    PngEncoder,
    TiffCompression,
    TiffEncoder,
    WrittenOutput,
};

pub use conversions::{
    Conversion,
    ConversionConfig,
    ConversionConfigBuilder,
    ConversionReport,
    GainEstimate,
    GainEstimator,
    Preset,
    RawToRgbPipeline,
};
