//! 2x2 block demosaic: one RGB pixel per Bayer cell.
//!
//! This is a 4:1 spatial downsample, not interpolation. The output is half
//! the sensor resolution in each dimension.

use ndarray::{Array2, Array3, Axis, Zip};
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::mosaic::{CfaLayout, extract_planes};
use crate::image_pipeline::debayer::types::{ChannelPlanes, LinearRgb};
use crate::image_pipeline::raw::RawFrame;

/// Element-wise mean of the two green planes, in floating point.
pub fn merge_green(planes: &ChannelPlanes<'_>) -> Array2<f32> {
    Zip::from(&planes.g1)
        .and(&planes.g2)
        .map_collect(|&g1, &g2| (f32::from(g1) + f32::from(g2)) / 2.0)
}

/// Stacks the planes into a `[R, G, B]` working image.
pub fn assemble_rgb(planes: &ChannelPlanes<'_>) -> LinearRgb {
    let (rows, cols) = planes.dim();
    let mut data = Array3::<f32>::zeros((rows, cols, 3));

    let green = merge_green(planes);
    data.index_axis_mut(Axis(2), 0).assign(&planes.r.mapv(f32::from));
    data.index_axis_mut(Axis(2), 1).assign(&green);
    data.index_axis_mut(Axis(2), 2).assign(&planes.b.mapv(f32::from));

    LinearRgb { data }
}

/// Block debayer over a fixed CFA layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockDebayer {
    layout: CfaLayout,
}

impl BlockDebayer {
    pub fn new(layout: CfaLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CfaLayout {
        &self.layout
    }

    pub fn process(&self, frame: &RawFrame) -> Result<LinearRgb> {
        let dims = frame.dims();
        let (rows, cols) = dims.half();
        debug!("Block debayer {}x{} -> {}x{}", dims.width, dims.height, cols, rows);

        let planes = extract_planes(frame.mosaic()?, &self.layout);
        Ok(assemble_rgb(&planes))
    }
}
