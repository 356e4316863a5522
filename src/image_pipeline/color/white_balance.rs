//! White balance estimation and correction.
//!
//! Gains are derived from the image itself, with green as the reference
//! channel. Statistics are accumulated in f64 and applied in f32.

use std::fmt;
use std::str::FromStr;

use ndarray::{ArrayView2, Axis};
use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::LinearRgb;
use crate::image_pipeline::raw::SENSOR_WHITE_LEVEL;

/// Guards the gain division against all-black channels.
pub const GAIN_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhiteBalanceMethod {
    /// Pass channels through unscaled.
    #[default]
    None,
    /// Scale red and blue so their means match green's.
    GrayWorld,
    /// Scale every channel so its maximum matches the mean of the three maxima.
    MaxWhite,
}

impl WhiteBalanceMethod {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, WhiteBalanceMethod::None)
    }
}

impl FromStr for WhiteBalanceMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gray_world" | "gray-world" | "grayworld" | "on" | "yes" | "1" | "true" => {
                Ok(WhiteBalanceMethod::GrayWorld)
            }
            "max_white" | "max-white" | "maxwhite" => Ok(WhiteBalanceMethod::MaxWhite),
            "off" | "no" | "0" | "false" | "none" => Ok(WhiteBalanceMethod::None),
            _ => Err(ConversionError::UnknownWhiteBalance(s.to_string())),
        }
    }
}

impl fmt::Display for WhiteBalanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WhiteBalanceMethod::None => "off",
            WhiteBalanceMethod::GrayWorld => "gray_world",
            WhiteBalanceMethod::MaxWhite => "max_white",
        })
    }
}

/// Per-channel multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainTriple {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl GainTriple {
    pub const UNITY: GainTriple = GainTriple { r: 1.0, g: 1.0, b: 1.0 };

    /// Command line that feeds these gains to the camera white-balance script.
    pub fn camera_command(&self, script: &str) -> String {
        format!("{script} {:.3} {:.3} {:.3}", self.r, self.g, self.b)
    }

    fn as_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for GainTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R={:.3}, G={:.3}, B={:.3}", self.r, self.g, self.b)
    }
}

/// Mean (or any other per-channel statistic) of R, G and B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl fmt::Display for ChannelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R: {:.1}, G: {:.1}, B: {:.1}", self.r, self.g, self.b)
    }
}

/// Arithmetic mean of a plane; 0 for an empty plane.
pub fn plane_mean<A>(plane: ArrayView2<'_, A>) -> f64
where
    A: Copy + Into<f64>,
{
    if plane.is_empty() {
        return 0.0;
    }
    plane.iter().map(|&v| Into::<f64>::into(v)).sum::<f64>() / plane.len() as f64
}

fn plane_max(plane: ArrayView2<'_, f32>) -> f64 {
    plane.iter().copied().fold(0.0f32, f32::max).into()
}

pub fn channel_means(image: &LinearRgb) -> ChannelStats {
    ChannelStats {
        r: plane_mean(image.data.index_axis(Axis(2), 0)),
        g: plane_mean(image.data.index_axis(Axis(2), 1)),
        b: plane_mean(image.data.index_axis(Axis(2), 2)),
    }
}

pub fn channel_maxima(image: &LinearRgb) -> ChannelStats {
    ChannelStats {
        r: plane_max(image.data.index_axis(Axis(2), 0)),
        g: plane_max(image.data.index_axis(Axis(2), 1)),
        b: plane_max(image.data.index_axis(Axis(2), 2)),
    }
}

/// Gray-world gains: green mean over each channel mean, green fixed at 1.
pub fn gray_world_gains(means: &ChannelStats) -> GainTriple {
    GainTriple {
        r: (means.g / (means.r + GAIN_EPSILON)) as f32,
        g: 1.0,
        b: (means.g / (means.b + GAIN_EPSILON)) as f32,
    }
}

/// Max-white gains: mean of the three maxima over each channel maximum.
pub fn max_white_gains(maxima: &ChannelStats) -> GainTriple {
    let reference = (maxima.r + maxima.g + maxima.b) / 3.0;
    GainTriple {
        r: (reference / (maxima.r + GAIN_EPSILON)) as f32,
        g: (reference / (maxima.g + GAIN_EPSILON)) as f32,
        b: (reference / (maxima.b + GAIN_EPSILON)) as f32,
    }
}

/// Multiplies each channel by its gain, optionally clamping to the sensor range.
pub fn apply_gains(image: &mut LinearRgb, gains: &GainTriple, clip_to_sensor_range: bool) {
    let ceiling = f32::from(SENSOR_WHITE_LEVEL);
    for (channel, gain) in gains.as_array().into_iter().enumerate() {
        let mut plane = image.data.index_axis_mut(Axis(2), channel);
        if clip_to_sensor_range {
            plane.mapv_inplace(|v| (v * gain).clamp(0.0, ceiling));
        } else {
            plane.mapv_inplace(|v| v * gain);
        }
    }
}

/// Balances `image` in place and returns the gains that were applied.
///
/// Returns `None` when the method is disabled. The gains are also logged,
/// since tuning workflows read them from the conversion output.
pub fn white_balance(
    image: &mut LinearRgb,
    method: WhiteBalanceMethod,
    clip_to_sensor_range: bool,
) -> Option<GainTriple> {
    let gains = match method {
        WhiteBalanceMethod::None => return None,
        WhiteBalanceMethod::GrayWorld => gray_world_gains(&channel_means(image)),
        WhiteBalanceMethod::MaxWhite => max_white_gains(&channel_maxima(image)),
    };

    info!("White balance gains ({}): {}", method, gains);
    apply_gains(image, &gains, clip_to_sensor_range);
    Some(gains)
}
