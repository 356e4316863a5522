use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::{
    color::WhiteBalanceMethod,
    common::{
        error::{ConversionError, Result},
        warning::{PipelineWarning, SizeMismatch},
    },
    conversions::{
        config::{ConversionConfig, Preset},
        raw_to_rgb::RawToRgbPipeline,
    },
    debayer::Rgb8Image,
    output::{ImageEncoder, OutputKind},
    raw::{FlatSampleReader, FrameDims, LoadedFrame, RawFrame, RawFrameReader},
};

struct MockReader {
    should_fail: bool,
    samples: Option<Vec<u16>>,
}

impl RawFrameReader for MockReader {
    fn read_frame(&self, _data: &[u8], dims: FrameDims) -> Result<LoadedFrame> {
        if self.should_fail {
            return Err(ConversionError::InputReadError("Mock read error".to_string()));
        }
        let samples = self
            .samples
            .clone()
            .unwrap_or_else(|| vec![0u16; dims.pixel_count().unwrap_or(0)]);
        Ok(LoadedFrame {
            frame: RawFrame::new(dims, samples)?,
            size_mismatch: None,
        })
    }
}

struct MockEncoder {
    available: bool,
    should_fail: bool,
    written: Arc<Mutex<Vec<Rgb8Image>>>,
}

impl MockEncoder {
    fn new(available: bool) -> (Self, Arc<Mutex<Vec<Rgb8Image>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                available,
                should_fail: false,
                written: written.clone(),
            },
            written,
        )
    }
}

impl ImageEncoder for MockEncoder {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn extension(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn encode(&self, image: &Rgb8Image, output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push(image.clone());
        output.write_all(b"mock")?;
        Ok(())
    }
}

fn le_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn small_config(flip: bool) -> ConversionConfig {
    ConversionConfig::builder()
        .dimensions(4, 4)
        .brightness(1.0)
        .white_balance(WhiteBalanceMethod::None)
        .flip_vertical(flip)
        .build()
}

#[test]
fn test_config_builder() {
    let config = ConversionConfig::builder()
        .preset(Preset::WhiteBalanced)
        .dimensions(640, 480)
        .flip_vertical(false)
        .build();

    assert_eq!((config.width, config.height), (640, 480));
    assert_eq!(config.brightness, 3.0);
    assert_eq!(config.white_balance, WhiteBalanceMethod::GrayWorld);
    assert!(!config.flip_vertical);
    assert!(config.fallback_to_array);
}

#[test]
fn test_default_config_is_plain_preset() {
    let config = ConversionConfig::default();
    assert_eq!(config, ConversionConfig::from_preset(Preset::Plain));
    assert_eq!((config.width, config.height), (1920, 1080));
    assert_eq!(config.brightness, 1.0);
    assert!(!config.flip_vertical);
}

#[test]
fn test_presets() {
    let bright = ConversionConfig::from_preset(Preset::Bright);
    assert_eq!(bright.brightness, 3.0);
    assert!(bright.flip_vertical);
    assert!(!bright.white_balance.is_enabled());

    let improved = ConversionConfig::from_preset(Preset::Improved);
    assert_eq!(improved.white_balance, WhiteBalanceMethod::GrayWorld);
    assert!(improved.clip_balanced);

    assert_eq!("white-balanced".parse::<Preset>().unwrap(), Preset::WhiteBalanced);
    assert!("sepia".parse::<Preset>().is_err());
}

#[test]
fn test_constant_white_frame_without_flip() {
    let pipeline = RawToRgbPipeline::new(small_config(false)).unwrap();
    let conversion = pipeline.convert(&le_bytes(&[1023; 16])).unwrap();

    assert_eq!(conversion.image.data.dim(), (2, 2, 3));
    assert!(conversion.image.data.iter().all(|&v| v == 255));
    assert!(conversion.gains.is_none());
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_constant_white_frame_with_flip() {
    let pipeline = RawToRgbPipeline::new(small_config(true)).unwrap();
    let conversion = pipeline.convert(&le_bytes(&[1023; 16])).unwrap();

    assert_eq!(conversion.image.data.dim(), (2, 2, 3));
    assert!(conversion.image.data.iter().all(|&v| v == 255));
    assert!(conversion.timings.get_step("flip").is_some());
}

#[test]
fn test_flip_flag_controls_row_order() {
    // Top cell row bright, bottom cell row black.
    let mut samples = vec![1023u16; 8];
    samples.extend([0u16; 8]);
    let input = le_bytes(&samples);

    let upright = RawToRgbPipeline::new(small_config(false)).unwrap().convert(&input).unwrap();
    let flipped = RawToRgbPipeline::new(small_config(true)).unwrap().convert(&input).unwrap();

    assert_eq!(upright.image.pixel(0, 0), [255, 255, 255]);
    assert_eq!(upright.image.pixel(1, 1), [0, 0, 0]);
    assert_eq!(flipped.image.pixel(0, 0), [0, 0, 0]);
    assert_eq!(flipped.image.pixel(1, 1), [255, 255, 255]);
}

#[test]
fn test_white_balance_runs_before_brightness() {
    // G=200, R=100, B=50 everywhere: gray world brings all channels to 200.
    let cell = [200u16, 100, 200, 100, 50, 200, 50, 200];
    let samples: Vec<u16> = cell.iter().chain(cell.iter()).copied().collect();
    let config = ConversionConfig::builder()
        .dimensions(4, 4)
        .brightness(3.0)
        .white_balance(WhiteBalanceMethod::GrayWorld)
        .build();

    let conversion = RawToRgbPipeline::new(config).unwrap().convert(&le_bytes(&samples)).unwrap();

    let gains = conversion.gains.unwrap();
    assert!((gains.r - 2.0).abs() < 1e-4);
    assert!((gains.b - 4.0).abs() < 1e-4);
    // 200 * 3 / 1023 * 255 = 149.56
    for &v in conversion.image.data.iter() {
        assert_eq!(v, 150);
    }
}

#[test]
fn test_short_input_reports_size_mismatch_once() {
    let pipeline = RawToRgbPipeline::new(small_config(false)).unwrap();
    let conversion = pipeline.convert(&le_bytes(&[1023; 8])).unwrap();

    assert_eq!(
        conversion.warnings,
        vec![PipelineWarning::SizeMismatch(SizeMismatch { expected: 16, actual: 8 })]
    );
    assert_eq!(conversion.image.pixel(0, 1), [255, 255, 255]);
    // Padded bottom cell row is black.
    assert_eq!(conversion.image.pixel(1, 0), [0, 0, 0]);
}

#[test]
fn test_reader_failure() {
    let (encoder, written) = MockEncoder::new(true);
    let reader = MockReader { should_fail: true, samples: None };
    let pipeline = RawToRgbPipeline::with_custom(reader, encoder, small_config(false));

    let result = pipeline.convert(b"fake raw data");

    assert!(matches!(result.unwrap_err(), ConversionError::InputReadError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_invalid_dimensions_rejected() {
    let config = ConversionConfig::builder().dimensions(0, 1080).build();
    assert!(matches!(
        RawToRgbPipeline::new(config).err().unwrap(),
        ConversionError::InvalidDimensions(0, 1080)
    ));
}

#[test]
fn test_overflowing_dimensions_rejected() {
    let width = usize::MAX / 2;
    let config = ConversionConfig::builder().dimensions(width, 4).build();
    assert!(matches!(
        RawToRgbPipeline::new(config).err().unwrap(),
        ConversionError::InvalidDimensions(w, 4) if w == width
    ));

    // A pipeline built around the check still refuses to convert.
    let (encoder, _) = MockEncoder::new(true);
    let config = ConversionConfig::builder().dimensions(width, 4).build();
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, config);
    assert!(matches!(
        pipeline.convert(&le_bytes(&[0; 16])).unwrap_err(),
        ConversionError::InvalidDimensions(_, 4)
    ));
}

#[test]
fn test_strict_dimensions_reject_odd_sizes() {
    let lenient = ConversionConfig::builder().dimensions(5, 4).build();
    let conversion = RawToRgbPipeline::new(lenient).unwrap().convert(&le_bytes(&[512; 20])).unwrap();
    assert_eq!(conversion.image.data.dim(), (2, 2, 3));

    let strict = ConversionConfig::builder().dimensions(5, 4).strict_dimensions(true).build();
    assert!(matches!(
        RawToRgbPipeline::new(strict).err().unwrap(),
        ConversionError::InvalidDimensions(5, 4)
    ));
}

#[test]
fn test_invalid_brightness_rejected() {
    for brightness in [-1.0, f32::NAN, f32::INFINITY] {
        let config = ConversionConfig::builder().brightness(brightness).build();
        assert!(matches!(
            RawToRgbPipeline::new(config).err().unwrap(),
            ConversionError::InvalidBrightness(_)
        ));
    }
}

#[test]
fn test_convert_file_writes_image_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.raw");
    std::fs::write(&input, le_bytes(&[1023; 16])).unwrap();

    let (encoder, written) = MockEncoder::new(true);
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, small_config(false));
    let report = pipeline.convert_file(&input, None).unwrap();

    assert_eq!(report.output.path, dir.path().join("capture.mock"));
    assert_eq!(report.output.kind, OutputKind::Image);
    assert_eq!((report.width, report.height), (2, 2));
    assert!(!report.is_degraded());
    assert_eq!(std::fs::read(&report.output.path).unwrap(), b"mock");
    assert_eq!(written.lock().unwrap().len(), 1);
}

#[test]
fn test_unavailable_encoder_falls_back_to_array() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.raw");
    std::fs::write(&input, le_bytes(&[1023; 16])).unwrap();

    let (encoder, written) = MockEncoder::new(false);
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, small_config(false));
    let report = pipeline.convert_file(&input, None).unwrap();

    assert_eq!(report.output.path, dir.path().join("capture.npy"));
    assert!(report.is_degraded());
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, PipelineWarning::DegradedOutput { encoder: "Mock", .. })));
    assert!(written.lock().unwrap().is_empty());

    let bytes = std::fs::read(&report.output.path).unwrap();
    assert_eq!(&bytes[..6], b"\x93NUMPY");
    assert_eq!(&bytes[bytes.len() - 12..], &[255u8; 12]);
}

#[test]
fn test_unavailable_encoder_without_fallback_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.raw");
    std::fs::write(&input, le_bytes(&[1023; 16])).unwrap();

    let config = ConversionConfig::builder()
        .dimensions(4, 4)
        .fallback_to_array(false)
        .build();
    let (encoder, _) = MockEncoder::new(false);
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, config);

    assert!(matches!(
        pipeline.convert_file(&input, None).unwrap_err(),
        ConversionError::EncoderUnavailable(_)
    ));
    assert!(!dir.path().join("capture.npy").exists());
}

#[test]
fn test_encoder_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.raw");
    std::fs::write(&input, le_bytes(&[0; 16])).unwrap();

    let (mut encoder, _) = MockEncoder::new(true);
    encoder.should_fail = true;
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, small_config(false));

    assert!(matches!(
        pipeline.convert_file(&input, None).unwrap_err(),
        ConversionError::EncodeError(_)
    ));
    assert!(!dir.path().join("capture.mock").exists());
}

#[test]
fn test_missing_input_file() {
    let pipeline = RawToRgbPipeline::new(small_config(false)).unwrap();
    assert!(matches!(
        pipeline.convert_file("/nonexistent/capture.raw", None).unwrap_err(),
        ConversionError::InputReadError(_)
    ));
}

#[test]
fn test_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.raw");
    let output = dir.path().join("preview.out");
    std::fs::write(&input, le_bytes(&[1023; 16])).unwrap();

    let (encoder, _) = MockEncoder::new(true);
    let pipeline = RawToRgbPipeline::with_custom(FlatSampleReader::default(), encoder, small_config(true));
    let report = pipeline.convert_file(&input, Some(&output)).unwrap();

    assert_eq!(report.output.path, output);
    assert!(output.exists());
}

#[cfg(feature = "png")]
#[test]
fn test_png_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.raw");
    std::fs::write(&input, le_bytes(&[1023; 16])).unwrap();

    let report = RawToRgbPipeline::new(small_config(true)).unwrap().convert_file(&input, None).unwrap();

    assert_eq!(report.output.path, dir.path().join("frame.png"));
    let decoded = image::open(&report.output.path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (2, 2));
    assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255]));
}
