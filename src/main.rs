use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use gc2607_rawview_rs::image_pipeline::{
    ConversionConfig, FlatSampleReader, FrameDims, GainEstimator, ImageEncoder, PngEncoder,
    Preset, RawToRgbPipeline, SampleEndian, TiffCompression, TiffEncoder, WhiteBalanceMethod,
    conversions::{DEFAULT_HEIGHT, DEFAULT_WB_SCRIPT, DEFAULT_WIDTH},
};
use gc2607_rawview_rs::logger::{self, info, warn};

#[derive(Parser)]
#[command(name = "gc2607_rawview", version, about = "Convert raw GRBG10 sensor captures to viewable RGB images")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a raw capture to an 8-bit RGB image at half resolution
    Convert(ConvertArgs),
    /// Compute gray-world white balance gains for the camera configuration
    Gains(GainsArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Raw capture: flat 16-bit samples, GRBG mosaic
    raw_file: PathBuf,

    /// Sensor width in pixels
    #[arg(default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Sensor height in pixels
    #[arg(default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Base settings: plain, bright, improved or white-balanced
    #[arg(long, default_value_t = Preset::Plain)]
    preset: Preset,

    /// Brightness multiplier applied before 8-bit quantization
    #[arg(short, long)]
    brightness: Option<f32>,

    /// White balance: gray_world, max_white, or off/no/0/false
    #[arg(long = "wb")]
    white_balance: Option<WhiteBalanceMethod>,

    /// Flip the image vertically (true/false)
    #[arg(long)]
    flip: Option<bool>,

    /// Clamp balanced channels to the 10-bit range before tone mapping (true/false)
    #[arg(long)]
    clip_balanced: Option<bool>,

    /// Reject odd dimensions instead of dropping the trailing row/column
    #[arg(long)]
    strict: bool,

    /// Samples are stored big-endian
    #[arg(long)]
    big_endian: bool,

    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    #[arg(long, value_enum, default_value_t = Compression::None)]
    tiff_compression: Compression,

    /// Fail instead of saving a raw .npy array when the image encoder is unavailable
    #[arg(long)]
    no_fallback: bool,

    /// Output path (default: input path with the image extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print per-stage timings
    #[arg(long)]
    timings: bool,
}

#[derive(Args)]
struct GainsArgs {
    /// Raw capture: flat 16-bit samples, GRBG mosaic
    raw_file: PathBuf,

    #[arg(default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Camera white-balance script shown in the suggested command
    #[arg(long, default_value = DEFAULT_WB_SCRIPT)]
    script: String,

    #[arg(long)]
    big_endian: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Tiff,
}

#[derive(Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<Compression> for TiffCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::DeflateFast,
            Compression::DeflateBalanced => TiffCompression::DeflateBalanced,
            Compression::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn sample_order(big_endian: bool) -> SampleEndian {
    if big_endian { SampleEndian::Big } else { SampleEndian::Little }
}

fn build_config(args: &ConvertArgs) -> ConversionConfig {
    let mut builder = ConversionConfig::builder()
        .preset(args.preset)
        .dimensions(args.width, args.height)
        .fallback_to_array(!args.no_fallback)
        .strict_dimensions(args.strict)
        .sample_order(sample_order(args.big_endian));

    if let Some(brightness) = args.brightness {
        builder = builder.brightness(brightness);
    }
    if let Some(method) = args.white_balance {
        builder = builder.white_balance(method);
    }
    if let Some(flip) = args.flip {
        builder = builder.flip_vertical(flip);
    }
    if let Some(clip) = args.clip_balanced {
        builder = builder.clip_balanced(clip);
    }
    builder.build()
}

fn run_convert<E: ImageEncoder>(args: &ConvertArgs, config: ConversionConfig, encoder: E) -> Result<()> {
    info!(
        "Preset {} (brightness={}, wb={}, flip={})",
        args.preset, config.brightness, config.white_balance, config.flip_vertical
    );

    let reader = FlatSampleReader::new(config.sample_order);
    let pipeline = RawToRgbPipeline::with_custom(reader, encoder, config);
    let report = pipeline
        .convert_file(&args.raw_file, args.output.as_deref())
        .with_context(|| format!("Failed to convert {}", args.raw_file.display()))?;

    if let Some(gains) = report.gains {
        println!("White balance gains: {gains}");
    }
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }
    if report.is_degraded() {
        println!("Saved numpy array to {}", report.output.path.display());
    } else {
        println!("Saved to {}", report.output.path.display());
    }
    println!("Size: {}x{}", report.width, report.height);

    if args.timings {
        println!("\n{}", report.timings.summary());
    }
    Ok(())
}

fn run_gains(args: &GainsArgs) -> Result<()> {
    let dims = FrameDims::new(args.width, args.height);
    let reader = FlatSampleReader::new(sample_order(args.big_endian));
    let estimator = GainEstimator::with_reader(reader, dims, Default::default());

    let estimate = estimator
        .estimate_file(&args.raw_file)
        .with_context(|| format!("Failed to measure {}", args.raw_file.display()))?;

    if let Some(mismatch) = estimate.size_mismatch {
        warn!("Gains measured on a resized frame ({} of {} samples present)", mismatch.actual, mismatch.expected);
    }
    println!("{}", estimate.report(&args.script));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(if cli.verbose { "debug" } else { "info" });

    match &cli.command {
        Command::Convert(args) => {
            let config = build_config(args);
            match args.format {
                Format::Png => run_convert(args, config, PngEncoder),
                Format::Tiff => run_convert(args, config, TiffEncoder::new(args.tiff_compression.into())),
            }
        }
        Command::Gains(args) => run_gains(args),
    }
}
