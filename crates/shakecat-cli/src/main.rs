mod adapters;
mod config;
mod decay;
mod report;
mod runtime;
mod sensor;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use shakecat_core::{
    Haptics, MotionCapability, NoHaptics, NoShare, PromptAnswer, ShakeSession, ShareTarget,
};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use crate::adapters::{FileClipboard, LogHaptics, StdoutShare};
use crate::config::Config;
use crate::report::Reporter;
use crate::runtime::{Driver, request_permission};
use crate::sensor::{InputSource, ReplaySensor, TapScript};

#[derive(Parser)]
#[command(name = "shakecat", about = "Shake the cat, get a prediction")]
struct Cli {
    /// Config file (overrides SHAKECAT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Seed for the reveal pick
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded acceleration samples (`-` reads stdin)
    Replay {
        file: PathBuf,

        /// Simulated platform permission gate
        #[arg(long, value_enum, default_value_t = Permission::Ungated)]
        permission: Permission,

        /// Pace samples by their timestamps
        #[arg(long)]
        realtime: bool,
    },

    /// Run a fallback round from synthesized taps
    Tap {
        #[arg(long, default_value_t = 13)]
        count: u32,

        #[arg(long, default_value_t = 150)]
        interval_ms: u64,

        /// Pace taps on the wall clock
        #[arg(long)]
        realtime: bool,
    },

    /// Reveal by tapping, then share the prediction
    Share {
        /// No share sheet; copy the text to this file instead
        #[arg(long)]
        copy_to: Option<PathBuf>,
    },

    /// Print the effective message catalog
    Catalog,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Permission {
    /// Sensor available without a prompt
    Ungated,
    /// Prompt answered with a grant
    Granted,
    /// Prompt answered with a denial
    Denied,
    /// Prompt fails
    Error,
    /// No motion sensor
    Unavailable,
}

impl Permission {
    fn capability(self) -> MotionCapability {
        match self {
            Permission::Ungated => MotionCapability::Ungated,
            Permission::Granted | Permission::Denied | Permission::Error => {
                MotionCapability::Gated
            }
            Permission::Unavailable => MotionCapability::Unsupported,
        }
    }

    fn answer(self) -> Result<PromptAnswer, String> {
        match self {
            Permission::Denied => Ok(PromptAnswer::Denied),
            Permission::Error => Err("permission prompt failed".to_string()),
            _ => Ok(PromptAnswer::Granted),
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &config.source {
        tracing::debug!("loaded config from {}", path.display());
    }

    match &cli.command {
        Commands::Replay {
            file,
            permission,
            realtime,
        } => cmd_replay(&cli, config, file, *permission, *realtime).await,
        Commands::Tap {
            count,
            interval_ms,
            realtime,
        } => cmd_tap(&cli, config, *count, *interval_ms, *realtime).await,
        Commands::Share { copy_to } => cmd_share(&cli, config, copy_to.as_deref()).await,
        Commands::Catalog => cmd_catalog(&cli, &config),
    }
}

/// Cancelled on ctrl-c.
fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    token
}

fn build_driver(cli: &Cli, config: Config) -> Driver<SmallRng> {
    let rng = match cli.seed.or(config.seed) {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let haptics: Box<dyn Haptics + Send> = if config.haptics_enabled {
        Box::new(LogHaptics)
    } else {
        Box::new(NoHaptics)
    };
    Driver::new(
        ShakeSession::new(config.session),
        rng,
        haptics,
        Reporter::stdout(cli.json),
        shutdown_on_ctrl_c(),
    )
}

async fn cmd_replay(
    cli: &Cli,
    config: Config,
    file: &Path,
    permission: Permission,
    realtime: bool,
) -> Result<()> {
    let capability = permission.capability();
    let source: Box<dyn InputSource> = if file == Path::new("-") {
        Box::new(
            ReplaySensor::new(BufReader::new(tokio::io::stdin()), capability).realtime(realtime),
        )
    } else {
        let f = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("failed to open {}", file.display()))?;
        Box::new(ReplaySensor::new(BufReader::new(f), capability).realtime(realtime))
    };

    let mut driver = build_driver(cli, config);
    let outcome =
        request_permission(source.as_ref(), std::future::ready(permission.answer())).await;
    driver.start(outcome)?;
    driver.run(source).await?;
    Ok(())
}

async fn cmd_tap(
    cli: &Cli,
    config: Config,
    count: u32,
    interval_ms: u64,
    realtime: bool,
) -> Result<()> {
    let source = TapScript {
        count,
        interval_ms,
        realtime,
    };
    let mut driver = build_driver(cli, config);
    let outcome =
        request_permission(&source, std::future::ready(Ok(PromptAnswer::Granted))).await;
    driver.start(outcome)?;
    driver.run(Box::new(source)).await?;
    Ok(())
}

async fn cmd_share(cli: &Cli, config: Config, copy_to: Option<&Path>) -> Result<()> {
    let source = TapScript {
        count: 13,
        interval_ms: 150,
        realtime: false,
    };
    let mut driver = build_driver(cli, config);
    let outcome =
        request_permission(&source, std::future::ready(Ok(PromptAnswer::Granted))).await;
    driver.start(outcome)?;
    driver.run(Box::new(source)).await?;

    let (mut native, mut clipboard): (Box<dyn ShareTarget>, Box<dyn ShareTarget>) = match copy_to
    {
        Some(path) => (Box::new(NoShare), Box::new(FileClipboard::new(path.to_path_buf()))),
        None => (Box::new(StdoutShare), Box::new(NoShare)),
    };
    let outcome = driver
        .session()
        .share(native.as_mut(), clipboard.as_mut());
    tracing::debug!("share outcome: {outcome:?}");

    let reporter = driver.reporter();
    reporter.share(&outcome)?;
    reporter.flush()
}

fn cmd_catalog(cli: &Cli, config: &Config) -> Result<()> {
    let messages = config.session.catalog.messages();
    if cli.json {
        let line = serde_json::to_string(messages).context("failed to encode catalog")?;
        println!("{line}");
    } else {
        for (i, message) in messages.iter().enumerate() {
            println!("{:>2}. {message}", i + 1);
        }
    }
    Ok(())
}
