//! AR career kiosk - headless session simulator
//!
//! Runs the real orchestrator against a simulated stage:
//! - Configuration loading (falls back to defaults)
//! - Logging initialization
//! - Asset preload from the configured origin
//! - Scripted replay of tracking and navigation on a 60 Hz frame clock
//! - Final state summary as JSON on stdout

mod script;
mod stage;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use tokio::time::MissedTickBehavior;

use arkiosk_core::assets::{AssetCache, AssetFetcher, FsFetcher, HttpFetcher};
use arkiosk_core::config::{AssetOrigin, ConfigManager, ConfigResult, ConfigSection, Settings};
use arkiosk_core::logging::{init_tracing, init_tracing_with_file, LogLevel};
use arkiosk_core::orchestrator::Orchestrator;

use script::Script;
use stage::{ConsoleOverlay, SimStage};

/// 60 Hz.
const FRAME: Duration = Duration::from_micros(16_667);

type Kiosk = Orchestrator<SimStage, ConsoleOverlay>;

#[derive(Parser, Debug)]
#[command(name = "arkiosk-sim", about = "Replay a scripted AR kiosk session", version)]
struct Cli {
    /// Session script (JSON)
    #[arg(long)]
    script: PathBuf,

    /// Settings file (created with defaults if missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Simulated content instantiation time
    #[arg(long, default_value_t = 120)]
    load_latency_ms: u64,

    /// Simulate a visitor refusing camera access
    #[arg(long)]
    deny_camera: bool,

    /// Run the frame clock in real time instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Override the settle delay before marker-triggered playback
    #[arg(long)]
    settle_delay_ms: Option<u64>,

    /// Write command-line overrides back to the config file
    #[arg(long)]
    save_overrides: bool,
}

/// Per-user config path, or `.config/settings.toml` when the platform has
/// no home directory.
fn default_config_path() -> PathBuf {
    ProjectDirs::from("io.github", "arkiosk", "arkiosk")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from(".config").join("settings.toml"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: it decides where logs go
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config_manager = ConfigManager::new(&config_path);
    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let level = if cli.debug {
        LogLevel::Debug
    } else {
        config_manager.settings().logging.level
    };
    let _log_guard = if config_manager.settings().logging.file_logging {
        init_tracing_with_file(level, config_manager.logs_folder())
    } else {
        init_tracing(level);
        None
    };

    tracing::info!("Kiosk simulator starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", arkiosk_core::version());

    match apply_timing_overrides(&mut config_manager, cli.settle_delay_ms, cli.save_overrides) {
        Ok(true) => tracing::info!(
            "Settle delay overridden to {:?}",
            config_manager.settings().timing.settle_delay()
        ),
        Ok(false) => {}
        Err(e) => tracing::warn!("Failed to save [timing] override: {}", e),
    }

    let script = Script::load(&cli.script)?;
    tracing::info!(
        "Script: {} ({} steps over {:?})",
        cli.script.display(),
        script.steps.len(),
        script.duration()
    );

    let settings = config_manager.into_settings();
    let mut kiosk = build_kiosk(&cli, &settings).await?;

    if let Err(e) = kiosk.init_and_start() {
        print_summary(&kiosk, &cli.script)?;
        return Err(e).context("session did not start");
    }

    replay(&mut kiosk, &script, cli.realtime).await;

    tracing::info!(
        "Session finished: {} stage calls, {} live resources, {} attached nodes, {} playing videos",
        kiosk.stage().calls(),
        kiosk.stage().live_resources(),
        kiosk.stage().attached_nodes(),
        kiosk.stage().playing_videos()
    );
    tracing::debug!("Final state:\n{}", kiosk.summary().to_json_pretty()?);
    print_summary(&kiosk, &cli.script)
}

/// Apply command-line timing overrides; with `save`, persist `[timing]`
/// without touching the rest of the file.
///
/// Returns whether anything was overridden.
fn apply_timing_overrides(
    config: &mut ConfigManager,
    settle_delay_ms: Option<u64>,
    save: bool,
) -> ConfigResult<bool> {
    let Some(delay) = settle_delay_ms else {
        return Ok(false);
    };
    config.settings_mut().timing.settle_delay_ms = delay;
    if save {
        config.update_section(ConfigSection::Timing)?;
    }
    Ok(true)
}

async fn build_kiosk(cli: &Cli, settings: &Settings) -> Result<Kiosk> {
    let stage = SimStage::new(Duration::from_millis(cli.load_latency_ms), cli.deny_camera);
    let cache = AssetCache::new(settings.careers.clone());
    let mut kiosk = Orchestrator::new(stage, ConsoleOverlay::default(), cache, settings);
    let events = kiosk.event_sender();
    kiosk.stage_mut().connect(events);

    match settings.assets.origin() {
        AssetOrigin::Directory(root) => {
            tracing::info!("Loading assets from {}", root.display());
            preload(&mut kiosk, &FsFetcher::new(root)).await;
        }
        AssetOrigin::Http(base_url) => {
            tracing::info!("Loading assets from {}", base_url);
            let fetcher = HttpFetcher::new(base_url, settings.assets.request_timeout())
                .context("building HTTP asset client")?;
            preload(&mut kiosk, &fetcher).await;
        }
    }

    if let Some(warning) = kiosk.assets().batch_warning() {
        tracing::warn!("Asset origin problem during preload: {}", warning);
    }
    Ok(kiosk)
}

async fn preload<F: AssetFetcher>(kiosk: &mut Kiosk, fetcher: &F) {
    let assets = kiosk
        .preload(fetcher, |percent| eprintln!("Loading assets... {}%", percent))
        .await;
    let ready = assets.values().filter(|entry| entry.is_ready()).count();
    tracing::info!("{} of {} careers ready", ready, kiosk.assets().careers().len());
}

/// Replay the script on the frame clock.
///
/// Steps due at or before a frame are applied before that frame's stage
/// tick and orchestrator advance.
async fn replay(kiosk: &mut Kiosk, script: &Script, realtime: bool) {
    let mut ticker = tokio::time::interval(FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut steps = script.steps.iter().peekable();
    let mut elapsed = Duration::ZERO;

    while elapsed <= script.duration() {
        if realtime {
            ticker.tick().await;
        }

        while let Some(step) = steps.next_if(|step| step.at() <= elapsed) {
            tracing::info!("[{:>6} ms] {:?}", step.at_ms, step.action);
            step.action.apply(kiosk);
        }

        kiosk.stage_mut().tick(FRAME);
        kiosk.advance(FRAME);
        elapsed += FRAME;
    }
}

fn print_summary(kiosk: &Kiosk, script: &Path) -> Result<()> {
    let report = serde_json::json!({
        "finished_at": chrono::Local::now().to_rfc3339(),
        "script": script.display().to_string(),
        "enabled_careers": kiosk.overlay().enabled_careers().collect::<Vec<_>>(),
        "error": kiosk.overlay().last_error(),
        "summary": kiosk.summary(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
