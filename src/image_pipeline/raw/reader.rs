use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::{FrameDims, LoadedFrame};

pub trait RawFrameReader {
    fn read_frame(&self, data: &[u8], dims: FrameDims) -> Result<LoadedFrame>;
}
