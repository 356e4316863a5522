//! Conversion configuration types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::color::WhiteBalanceMethod;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::CfaLayout;
use crate::image_pipeline::raw::{FrameDims, SampleEndian};

pub const DEFAULT_WIDTH: usize = 1920;
pub const DEFAULT_HEIGHT: usize = 1080;

/// Named starting points matching the historical viewer variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Straight 2x2 conversion, no brightness boost, no white balance, no flip.
    #[default]
    Plain,
    /// 3x brightness, flipped.
    Bright,
    /// Gray-world balance clamped to the sensor range, flipped.
    Improved,
    /// Gray-world balance with 3x brightness, flipped.
    WhiteBalanced,
}

impl FromStr for Preset {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Preset::Plain),
            "bright" => Ok(Preset::Bright),
            "improved" => Ok(Preset::Improved),
            "white-balanced" | "white_balanced" | "wb" => Ok(Preset::WhiteBalanced),
            _ => Err(ConversionError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Plain => "plain",
            Preset::Bright => "bright",
            Preset::Improved => "improved",
            Preset::WhiteBalanced => "white-balanced",
        })
    }
}

/// Configuration for one RAW to RGB conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Sensor frame width in pixels
    pub width: usize,
    /// Sensor frame height in pixels
    pub height: usize,
    /// Linear multiplier applied before 8-bit quantization
    pub brightness: f32,
    pub white_balance: WhiteBalanceMethod,
    /// Reverse row order after quantization (sensor mounted upside down)
    pub flip_vertical: bool,
    /// Clamp white-balanced channels to the 10-bit range before tone mapping
    pub clip_balanced: bool,
    /// Persist the raw array when the image encoder is unavailable instead of failing
    pub fallback_to_array: bool,
    /// Reject odd dimensions instead of dropping the trailing row/column
    pub strict_dimensions: bool,
    pub sample_order: SampleEndian,
    pub layout: CfaLayout,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Plain)
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    pub fn from_preset(preset: Preset) -> Self {
        let (brightness, white_balance, flip_vertical, clip_balanced) = match preset {
            Preset::Plain => (1.0, WhiteBalanceMethod::None, false, false),
            Preset::Bright => (3.0, WhiteBalanceMethod::None, true, false),
            Preset::Improved => (1.0, WhiteBalanceMethod::GrayWorld, true, true),
            Preset::WhiteBalanced => (3.0, WhiteBalanceMethod::GrayWorld, true, false),
        };
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            brightness,
            white_balance,
            flip_vertical,
            clip_balanced,
            fallback_to_array: true,
            strict_dimensions: false,
            sample_order: SampleEndian::Little,
            layout: CfaLayout::GRBG,
        }
    }

    pub fn dims(&self) -> FrameDims {
        FrameDims::new(self.width, self.height)
    }

    /// Checks the configuration before any pixel is touched.
    pub fn validate(&self) -> Result<()> {
        validate_dims(self.dims(), self.strict_dimensions)?;

        if !self.brightness.is_finite() || self.brightness < 0.0 {
            return Err(ConversionError::InvalidBrightness(self.brightness));
        }

        Ok(())
    }
}

/// A frame needs at least one full 2x2 cell and an addressable sample count.
pub(crate) fn validate_dims(dims: FrameDims, strict: bool) -> Result<()> {
    if dims.width < 2 || dims.height < 2 || dims.pixel_count().is_none() {
        return Err(ConversionError::InvalidDimensions(dims.width, dims.height));
    }
    if strict && !dims.is_even() {
        return Err(ConversionError::InvalidDimensions(dims.width, dims.height));
    }
    Ok(())
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    preset: Option<Preset>,
    width: Option<usize>,
    height: Option<usize>,
    brightness: Option<f32>,
    white_balance: Option<WhiteBalanceMethod>,
    flip_vertical: Option<bool>,
    clip_balanced: Option<bool>,
    fallback_to_array: Option<bool>,
    strict_dimensions: Option<bool>,
    sample_order: Option<SampleEndian>,
    layout: Option<CfaLayout>,
}

impl ConversionConfigBuilder {
    /// Base values for every field not set explicitly.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn white_balance(mut self, method: WhiteBalanceMethod) -> Self {
        self.white_balance = Some(method);
        self
    }

    pub fn flip_vertical(mut self, flip: bool) -> Self {
        self.flip_vertical = Some(flip);
        self
    }

    pub fn clip_balanced(mut self, clip: bool) -> Self {
        self.clip_balanced = Some(clip);
        self
    }

    pub fn fallback_to_array(mut self, fallback: bool) -> Self {
        self.fallback_to_array = Some(fallback);
        self
    }

    pub fn strict_dimensions(mut self, strict: bool) -> Self {
        self.strict_dimensions = Some(strict);
        self
    }

    pub fn sample_order(mut self, order: SampleEndian) -> Self {
        self.sample_order = Some(order);
        self
    }

    pub fn layout(mut self, layout: CfaLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let base = ConversionConfig::from_preset(self.preset.unwrap_or_default());
        ConversionConfig {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            brightness: self.brightness.unwrap_or(base.brightness),
            white_balance: self.white_balance.unwrap_or(base.white_balance),
            flip_vertical: self.flip_vertical.unwrap_or(base.flip_vertical),
            clip_balanced: self.clip_balanced.unwrap_or(base.clip_balanced),
            fallback_to_array: self.fallback_to_array.unwrap_or(base.fallback_to_array),
            strict_dimensions: self.strict_dimensions.unwrap_or(base.strict_dimensions),
            sample_order: self.sample_order.unwrap_or(base.sample_order),
            layout: self.layout.unwrap_or(base.layout),
        }
    }
}
