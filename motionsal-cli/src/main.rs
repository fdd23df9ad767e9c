use clap::Parser;
use motionsal::io::{load_gray_image, save_mask_png};
use motionsal::{BlockRemainder, Bootstrap, MismatchDecay, MotionSaliency, MotionSaliencyConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Motion saliency over a frame sequence (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-stage profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MismatchDecayConfig {
    Inert,
    UntilMatch,
    All,
}

impl From<MismatchDecayConfig> for MismatchDecay {
    fn from(value: MismatchDecayConfig) -> Self {
        match value {
            MismatchDecayConfig::Inert => MismatchDecay::Inert,
            MismatchDecayConfig::UntilMatch => MismatchDecay::UntilMatch,
            MismatchDecayConfig::All => MismatchDecay::All,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BlockRemainderConfig {
    Foreground,
    PartialBlocks,
}

impl From<BlockRemainderConfig> for BlockRemainder {
    fn from(value: BlockRemainderConfig) -> Self {
        match value {
            BlockRemainderConfig::Foreground => BlockRemainder::Foreground,
            BlockRemainderConfig::PartialBlocks => BlockRemainder::PartialBlocks,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BootstrapConfig {
    FirstFrame,
    None,
}

impl From<BootstrapConfig> for Bootstrap {
    fn from(value: BootstrapConfig) -> Self {
        match value {
            BootstrapConfig::FirstFrame => Bootstrap::FirstFrame,
            BootstrapConfig::None => Bootstrap::None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SaliencyConfigJson {
    templates: usize,
    block_size: usize,
    coarse_templates: usize,
    learning_rate: f32,
    primary_cap: f32,
    secondary_cap: f32,
    promotion_threshold: f32,
    replacement_threshold: f32,
    promotion_gain: f32,
    initial_epsilon: f32,
    neighborhood_size: usize,
    mismatch_decay: MismatchDecayConfig,
    block_remainder: BlockRemainderConfig,
    bootstrap: BootstrapConfig,
    parallel: bool,
}

impl Default for SaliencyConfigJson {
    fn default() -> Self {
        let cfg = MotionSaliencyConfig::default();
        Self {
            templates: cfg.templates,
            block_size: cfg.block_size,
            coarse_templates: cfg.coarse_templates,
            learning_rate: cfg.learning_rate,
            primary_cap: cfg.primary_cap,
            secondary_cap: cfg.secondary_cap,
            promotion_threshold: cfg.promotion_threshold,
            replacement_threshold: cfg.replacement_threshold,
            promotion_gain: cfg.promotion_gain,
            initial_epsilon: cfg.initial_epsilon,
            neighborhood_size: cfg.neighborhood_size,
            mismatch_decay: MismatchDecayConfig::Inert,
            block_remainder: BlockRemainderConfig::Foreground,
            bootstrap: BootstrapConfig::FirstFrame,
            parallel: cfg.parallel,
        }
    }
}

impl From<SaliencyConfigJson> for MotionSaliencyConfig {
    fn from(value: SaliencyConfigJson) -> Self {
        Self {
            templates: value.templates,
            block_size: value.block_size,
            coarse_templates: value.coarse_templates,
            learning_rate: value.learning_rate,
            primary_cap: value.primary_cap,
            secondary_cap: value.secondary_cap,
            promotion_threshold: value.promotion_threshold,
            replacement_threshold: value.replacement_threshold,
            promotion_gain: value.promotion_gain,
            initial_epsilon: value.initial_epsilon,
            neighborhood_size: value.neighborhood_size,
            mismatch_decay: value.mismatch_decay.into(),
            block_remainder: value.block_remainder.into(),
            bootstrap: value.bootstrap.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    frames: Vec<String>,
    output_dir: Option<String>,
    write_noise: bool,
    output_path: Option<String>,
    saliency: SaliencyConfigJson,
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    index: usize,
    path: String,
    foreground: usize,
    noise: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    frames: Vec<FrameRecord>,
}

fn mask_path(dir: &Path, index: usize, suffix: &str) -> PathBuf {
    dir.join(format!("{index:06}_{suffix}.png"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("motionsal=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    let Some(first_path) = config.frames.first() else {
        return Err("frames must list at least one image".into());
    };

    let first = load_gray_image(first_path)?;
    let (width, height) = (first.width(), first.height());
    let mut detector = MotionSaliency::new(config.saliency.into())?;
    detector.initialize(width, height)?;

    let output_dir = config.output_dir.as_deref().map(PathBuf::from);
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut records = Vec::with_capacity(config.frames.len());
    for (index, path) in config.frames.iter().enumerate() {
        let frame = if index == 0 {
            first.clone()
        } else {
            load_gray_image(path)?
        };
        let masks = detector.process_frame(frame.view())?;
        tracing::info!(
            frame = index,
            foreground = masks.fused.count_foreground(),
            "processed frame"
        );

        if let Some(dir) = &output_dir {
            save_mask_png(&masks.fused, mask_path(dir, index, "fused"))?;
            if config.write_noise {
                save_mask_png(&masks.noise, mask_path(dir, index, "noise"))?;
            }
        }

        records.push(FrameRecord {
            index,
            path: path.clone(),
            foreground: masks.fused.count_foreground(),
            noise: masks.noise.count_foreground(),
        });
    }

    let output = Output {
        width,
        height,
        frames: records,
    };
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
