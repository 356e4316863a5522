//! Debayering module for converting GRBG mosaics to RGB

pub mod block_debayer;
pub mod mosaic;
pub mod types;

pub use block_debayer::{BlockDebayer, assemble_rgb, merge_green};
pub use mosaic::{CellOffset, CfaLayout, extract_planes};
pub use types::{ChannelPlanes, LinearRgb, Rgb8Image};
