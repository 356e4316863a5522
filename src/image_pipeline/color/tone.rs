//! Linear tone mapping to 8-bit and orientation fixup.

use ndarray::Axis;

use crate::image_pipeline::debayer::{LinearRgb, Rgb8Image};
use crate::image_pipeline::raw::SENSOR_WHITE_LEVEL;

/// Maximum 8-bit display value.
pub const DISPLAY_MAX: f32 = 255.0;

/// Maps one linear sample to 8 bits: `clip(v * brightness / 1023 * 255, 0, 255)`, rounded.
///
/// The white point is the fixed 10-bit ceiling, not the observed maximum.
/// Out-of-range values saturate silently.
#[inline]
pub fn tone_map_sample(value: f32, brightness: f32) -> u8 {
    let scaled = value * brightness / f32::from(SENSOR_WHITE_LEVEL) * DISPLAY_MAX;
    scaled.clamp(0.0, DISPLAY_MAX).round() as u8
}

pub fn tone_map(image: &LinearRgb, brightness: f32) -> Rgb8Image {
    Rgb8Image {
        data: image.data.mapv(|v| tone_map_sample(v, brightness)),
    }
}

/// Reverses the row order to match the sensor's physical readout orientation.
pub fn flip_vertical(image: Rgb8Image) -> Rgb8Image {
    let mut data = image.data;
    data.invert_axis(Axis(0));
    Rgb8Image {
        data: data.as_standard_layout().into_owned(),
    }
}
