use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    color::{GainTriple, flip_vertical, tone_map, white_balance},
    common::{
        error::{ConversionError, Result},
        warning::PipelineWarning,
    },
    conversions::{
        config::ConversionConfig,
        timing::{PipelineTimings, Timer},
    },
    debayer::{BlockDebayer, Rgb8Image},
    output::{ImageEncoder, NpyArrayWriter, OutputKind, PngEncoder, WrittenOutput},
    raw::{FlatSampleReader, RawFrameReader},
};

/// In-memory result of converting one frame.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub image: Rgb8Image,
    /// Gains applied by white balance, `None` when it was disabled.
    pub gains: Option<GainTriple>,
    pub warnings: Vec<PipelineWarning>,
    pub timings: PipelineTimings,
}

/// Result of converting a file, including where the output landed.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub output: WrittenOutput,
    pub width: usize,
    pub height: usize,
    pub gains: Option<GainTriple>,
    pub warnings: Vec<PipelineWarning>,
    pub timings: PipelineTimings,
}

impl ConversionReport {
    pub fn is_degraded(&self) -> bool {
        self.output.kind == OutputKind::RawArray
    }
}

pub struct RawToRgbPipeline<R: RawFrameReader, E: ImageEncoder> {
    reader: R,
    encoder: E,
    fallback: NpyArrayWriter,
    config: ConversionConfig,
}

impl RawToRgbPipeline<FlatSampleReader, PngEncoder> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: FlatSampleReader::new(config.sample_order),
            encoder: PngEncoder,
            fallback: NpyArrayWriter,
            config,
        })
    }
}

impl<R: RawFrameReader, E: ImageEncoder> RawToRgbPipeline<R, E> {
    pub fn with_custom(reader: R, encoder: E, config: ConversionConfig) -> Self {
        Self {
            reader,
            encoder,
            fallback: NpyArrayWriter,
            config,
        }
    }

    /// Runs load, extraction, white balance, tone mapping and flip on one frame.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8]) -> Result<Conversion> {
        self.config.validate()?;
        let mut timings = PipelineTimings::new();
        let mut warnings = Vec::new();

        info!(
            width = self.config.width,
            height = self.config.height,
            brightness = self.config.brightness,
            white_balance = %self.config.white_balance,
            "Converting Bayer frame to RGB"
        );

        let timer = Timer::start("load_frame");
        let loaded = {
            let _span = tracing::info_span!("load_frame").entered();
            self.reader.read_frame(input_data, self.config.dims())?
        };
        timings.record(timer);
        warnings.extend(loaded.size_mismatch.map(PipelineWarning::SizeMismatch));

        let timer = Timer::start("debayer");
        let mut linear = {
            let _span = tracing::info_span!("extract_planes").entered();
            BlockDebayer::new(self.config.layout).process(&loaded.frame)?
        };
        timings.record(timer);

        let timer = Timer::start("white_balance");
        let gains = {
            let _span = tracing::info_span!("white_balance", method = %self.config.white_balance).entered();
            white_balance(&mut linear, self.config.white_balance, self.config.clip_balanced)
        };
        timings.record(timer);

        let timer = Timer::start("tone_map");
        let mut image = {
            let _span = tracing::info_span!("tone_map", brightness = self.config.brightness).entered();
            tone_map(&linear, self.config.brightness)
        };
        timings.record(timer);

        if self.config.flip_vertical {
            let timer = Timer::start("flip");
            image = flip_vertical(image);
            timings.record(timer);
        }

        info!(width = image.width(), height = image.height(), "Conversion complete");
        Ok(Conversion {
            image,
            gains,
            warnings,
            timings,
        })
    }

    /// Default output location: the input path with the extension replaced.
    pub fn output_path_for(&self, input_path: &Path) -> PathBuf {
        let extension = if self.encoder.is_available() {
            self.encoder.extension()
        } else {
            self.fallback.extension()
        };
        input_path.with_extension(extension)
    }

    /// Writes `image` with the encoder, or as a raw array when the encoder is unavailable.
    ///
    /// The fallback rewrites the extension of `output_path` to `.npy`.
    pub fn write_output(
        &self,
        image: &Rgb8Image,
        output_path: &Path,
    ) -> Result<(WrittenOutput, Option<PipelineWarning>)> {
        let _span = tracing::info_span!("encode", encoder = self.encoder.name()).entered();

        if self.encoder.is_available() {
            let mut encoded = Vec::new();
            self.encoder.encode(image, &mut encoded)?;
            write_encoded(output_path, &encoded)?;
            return Ok((
                WrittenOutput {
                    path: output_path.to_path_buf(),
                    kind: OutputKind::Image,
                },
                None,
            ));
        }

        if !self.config.fallback_to_array {
            return Err(ConversionError::EncoderUnavailable(format!(
                "{} encoder not built in and array fallback is disabled",
                self.encoder.name()
            )));
        }

        let warning = PipelineWarning::DegradedOutput {
            encoder: self.encoder.name(),
            fallback: self.fallback.name(),
        };
        warn!("{}", warning);

        let path = output_path.with_extension(self.fallback.extension());
        let mut encoded = Vec::new();
        self.fallback.write_array(image, &mut encoded)?;
        write_encoded(&path, &encoded)?;
        Ok((
            WrittenOutput {
                path,
                kind: OutputKind::RawArray,
            },
            Some(warning),
        ))
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Option<&Path>,
    ) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_path_for(input_path));

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let Conversion {
            image,
            gains,
            mut warnings,
            mut timings,
        } = self.convert(&input_data)?;

        let timer = Timer::start("encode");
        let (output, degraded) = self.write_output(&image, &output_path)?;
        timings.record(timer);
        warnings.extend(degraded);

        timings.log_summary();
        info!(path = %output.path.display(), kind = ?output.kind, "Output written");

        Ok(ConversionReport {
            output,
            width: image.width(),
            height: image.height(),
            gains,
            warnings,
            timings,
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

/// Creates the output file only once the encoded bytes are complete.
fn write_encoded(path: &Path, encoded: &[u8]) -> Result<()> {
    let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
    std::fs::write(path, encoded)
        .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
