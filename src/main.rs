//! Binary entrypoint for the degradation preview tool.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use phonecam_degrade::config::{self, Config};
use phonecam_degrade::crop::VariableAspectCenterCrop;
use phonecam_degrade::pipeline::DegradationPipeline;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(
    name = "phonecam-degrade",
    about = "Synthesize low-quality smartphone capture artifacts on an image"
)]
struct Cli {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output image path
    output: PathBuf,

    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Center-crop to the configured resolution before degrading
    #[arg(long)]
    crop: bool,

    /// Seed for the crop and the degradation RNG
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("phonecam_degrade={}", level).parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = match &cli.config {
        Some(path) => config::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    cfg.validate().context("validating configuration")?;

    let image = image::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?
        .to_rgb8();
    info!(width = image.width(), height = image.height(), "loaded image");

    let seed = cli.seed.unwrap_or(0);
    let image = if cli.crop {
        let crop = VariableAspectCenterCrop::new(cfg.crop.clone())?;
        let cropped = crop.apply(&image, seed)?;
        info!(
            width = cropped.width(),
            height = cropped.height(),
            "applied center crop"
        );
        cropped
    } else {
        image
    };

    let pipeline = DegradationPipeline::new(cfg.degradation.clone())?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let degraded = pipeline.apply(&image, &mut rng)?;
    degraded
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "wrote degraded image");
    Ok(())
}
