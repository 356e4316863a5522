//! Gray-world gain measurement for camera white-balance tuning.
//!
//! Works directly on the four mosaic planes; nothing here is tone mapped or
//! flipped. The resulting gains are meant to be fed to the camera's own
//! white-balance controls.

use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    color::{ChannelStats, GainTriple, gray_world_gains, plane_mean},
    common::{
        error::{ConversionError, Result},
        warning::SizeMismatch,
    },
    conversions::config::validate_dims,
    debayer::{CfaLayout, extract_planes},
    raw::{FlatSampleReader, FrameDims, RawFrame, RawFrameReader},
};

/// Script that applies gains to the virtual camera.
pub const DEFAULT_WB_SCRIPT: &str = "./create_virtual_camera_wb.sh";

#[derive(Debug, Clone, PartialEq)]
pub struct GainEstimate {
    /// Channel means; green is the mean of the two green site means.
    pub means: ChannelStats,
    pub gains: GainTriple,
    pub size_mismatch: Option<SizeMismatch>,
}

impl GainEstimate {
    /// Human-readable report, ending with the command that applies the gains.
    pub fn report(&self, script: &str) -> String {
        format!(
            "Channel averages:\n  R: {:.1}\n  G: {:.1}\n  B: {:.1}\n\n\
             Gray World White Balance Gains:\n  Red:   {:.3}\n  Green: {:.3}\n  Blue:  {:.3}\n\n\
             To use these gains, run:\n  {}",
            self.means.r,
            self.means.g,
            self.means.b,
            self.gains.r,
            self.gains.g,
            self.gains.b,
            self.gains.camera_command(script)
        )
    }
}

pub struct GainEstimator<R: RawFrameReader> {
    reader: R,
    dims: FrameDims,
    layout: CfaLayout,
}

impl GainEstimator<FlatSampleReader> {
    pub fn new(dims: FrameDims) -> Self {
        Self::with_reader(FlatSampleReader::default(), dims, CfaLayout::GRBG)
    }
}

impl<R: RawFrameReader> GainEstimator<R> {
    pub fn with_reader(reader: R, dims: FrameDims, layout: CfaLayout) -> Self {
        Self { reader, dims, layout }
    }

    /// Means and gains of an already loaded frame.
    pub fn measure(&self, frame: &RawFrame) -> Result<(ChannelStats, GainTriple)> {
        let planes = extract_planes(frame.mosaic()?, &self.layout);

        let means = ChannelStats {
            r: plane_mean(planes.r),
            g: (plane_mean(planes.g1) + plane_mean(planes.g2)) / 2.0,
            b: plane_mean(planes.b),
        };
        Ok((means, gray_world_gains(&means)))
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn estimate(&self, input_data: &[u8]) -> Result<GainEstimate> {
        validate_dims(self.dims, false)?;

        let loaded = self.reader.read_frame(input_data, self.dims)?;
        let (means, gains) = self.measure(&loaded.frame)?;

        info!("Channel averages: {}", means);
        info!("Gray world gains: {}", gains);

        Ok(GainEstimate {
            means,
            gains,
            size_mismatch: loaded.size_mismatch,
        })
    }

    pub fn estimate_file<P: AsRef<Path>>(&self, input_path: P) -> Result<GainEstimate> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Estimating white balance gains");

        let input_data = std::fs::read(input_path).map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
        })?;
        self.estimate(&input_data)
    }
}
