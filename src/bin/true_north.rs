//! true-north CLI
//!
//! Feeds orientation readings into the compass engine and prints a frame for
//! every visible change. Readings come from stdin as JSON lines, or from a
//! simulated sweep.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use true_north::core::runtime;
use true_north::core::source::{self, Sweep};
use true_north::core::{CompassConfig, Frame, Heading, PermissionState};
use true_north::{logging, render_prompt, GeminiOracle, StaticOracle, VastuOracle};

/// 🧭 True North: a Vastu Shastra compass.
///
/// Reads device-orientation events and asks an LLM for a Vastu reading once
/// the heading settles.
#[derive(Parser, Debug)]
#[command(name = "true-north")]
#[command(version = true_north::VERSION)]
#[command(about = "🧭 True North: a Vastu Shastra compass")]
#[command(after_help = "EXAMPLES:
  # Stream readings from a sensor bridge
  sensor-bridge | true-north

  # Simulate a slow turn from north to east without network access
  true-north --simulate 0:90:5 --offline

  # One JSON frame per line
  true-north --simulate 350:10:2 --format json --offline

  # Show the prompt sent for a heading
  true-north --prompt 135

INPUT (one JSON object per line):
  {\"alpha\": 12.5}
  {\"webkitCompassHeading\": 90}
  {\"permission\": \"denied\"}
")]
struct Cli {
    /// Config file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormat,

    /// Answer from the built-in direction themes instead of the LLM
    #[arg(long = "offline")]
    offline: bool,

    /// Simulate a sweep instead of reading stdin: START:END:STEP
    #[arg(long = "simulate", value_name = "SWEEP")]
    simulate: Option<String>,

    /// Delay between simulated readings
    #[arg(long = "interval-ms", value_name = "MS", default_value = "100")]
    interval_ms: u64,

    /// Quiet period before a heading triggers a request (overrides config)
    #[arg(long = "debounce-ms", value_name = "MS")]
    debounce_ms: Option<u64>,

    /// LLM model name (overrides config)
    #[arg(long = "model", value_name = "NAME")]
    model: Option<String>,

    /// Print the rendered prompt for a heading and exit
    #[arg(long = "prompt", value_name = "DEGREES", allow_negative_numbers = true)]
    prompt: Option<f64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn print_frame(frame: &Frame, format: OutputFormat) {
    let rendered = match format {
        OutputFormat::Text => Ok(frame.render_text()),
        OutputFormat::Json => frame.render_json(),
    };
    match rendered {
        Ok(text) => {
            let mut stdout = std::io::stdout().lock();
            match writeln!(stdout, "{}", text).and_then(|_| stdout.flush()) {
                Ok(()) => {}
                // stdout closed, e.g. piped into `head`
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => log::warn!("could not write frame: {}", e),
            }
        }
        Err(e) => log::error!("could not render frame: {}", e),
    }
}

async fn drive<O: VastuOracle>(cli: &Cli, config: &CompassConfig, oracle: &O) -> Result<()> {
    let source = match &cli.simulate {
        Some(spec) => Sweep::parse(spec)
            .context("invalid --simulate")?
            .spawn(Duration::from_millis(cli.interval_ms)),
        None => source::spawn_stdin(),
    };

    let format = cli.format;
    let session = runtime::run(source, oracle, config, PermissionState::Granted, |frame| {
        print_frame(frame, format)
    })
    .await;

    log::info!(
        "session ended at {}",
        session.heading().map(|h| h.to_string()).unwrap_or_else(|| "no heading".to_string())
    );
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(logging::level_for(cli.verbose));

    if let Some(degrees) = cli.prompt {
        let heading = Heading::new(degrees).context("invalid --prompt heading")?;
        print!("{}", render_prompt(heading));
        return Ok(());
    }

    let mut config = CompassConfig::discover(cli.config.as_deref()).context("loading config")?;
    if let Some(ms) = cli.debounce_ms {
        config = config.with_debounce_ms(ms);
    }
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    config.validate().context("invalid configuration")?;

    if cli.offline {
        drive(&cli, &config, &StaticOracle).await
    } else {
        let oracle = GeminiOracle::new(config.llm.clone())
            .context("LLM client unavailable (use --offline to run without one)")?;
        drive(&cli, &config, &oracle).await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
