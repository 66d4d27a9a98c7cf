//! tollgate-app - the launch-flow shell
//!
//! This binary is the wiring reference for the launch flow:
//! - Settings loading
//! - Store initialization
//! - Activation gate, run once against the captured inputs
//! - Flow state, observed the way a presentation layer would
//!
//! On a device the platform shell replaces this binary and additionally
//! hosts the embedded browser behind `tollgate_surface::BrowserEngine`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tollgate_config::{DeviceClass, Settings, load_settings};
use tollgate_core::{
    ActivationGate, FlowState, GateDecision, GateInputs, ReviewPrompter,
    schedule_review_prompt,
};
use tollgate_store::{SqliteStore, Store};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Launch-flow shell for the tollgate expense tracker
#[derive(Parser, Debug)]
#[command(name = "tollgate-app")]
#[command(about = "Launch-flow shell for the tollgate expense tracker", long_about = None)]
struct Args {
    /// Settings file path (default: ~/.config/tollgate/settings.toml)
    #[arg(short, long, default_value_os_t = tollgate_util::default_settings_path())]
    settings: PathBuf,

    /// Data directory override (or set TOLLGATE_DATA_DIR env var)
    #[arg(short, long, env = "TOLLGATE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Device class override
    #[arg(long, value_enum)]
    device_class: Option<DeviceClassArg>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeviceClassArg {
    Phone,
    Tablet,
}

impl From<DeviceClassArg> for DeviceClass {
    fn from(arg: DeviceClassArg) -> Self {
        match arg {
            DeviceClassArg::Phone => DeviceClass::Phone,
            DeviceClassArg::Tablet => DeviceClass::Tablet,
        }
    }
}

/// Review prompter for a shell with no presentable window surface.
/// Reporting "not shown" leaves the marker unset for a real shell later.
struct HeadlessPrompter;

#[async_trait::async_trait]
impl ReviewPrompter for HeadlessPrompter {
    async fn request_review(&self) -> bool {
        false
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    if tollgate_util::is_mock_time_active() {
        info!("Running with mock time");
    }

    // Load settings; a missing file means defaults, not an error.
    let settings = if args.settings.exists() {
        load_settings(&args.settings)
            .with_context(|| format!("Failed to load settings from {:?}", args.settings))?
    } else {
        debug!(path = %args.settings.display(), "No settings file, using defaults");
        Settings::default()
    };

    let data_dir = args.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = data_dir.join("tollgate.db");
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    info!(db_path = %db_path.display(), "Store initialized");

    let device_class = args
        .device_class
        .map(DeviceClass::from)
        .unwrap_or(settings.device_class);

    let flow = FlowState::new();
    let gate = ActivationGate::new(store.clone());
    let inputs = GateInputs::capture(device_class);

    let decision = gate.run(&inputs, &flow);

    match &decision {
        GateDecision::Native { reason } => {
            info!(
                reason = reason.as_str(),
                "Presenting native expense tracker"
            );
        }
        GateDecision::WebSurface { endpoint } => {
            info!(endpoint = %endpoint, "Presenting embedded web surface");

            // The review prompt fires on its own schedule; await it here so
            // the process doesn't exit with the task pending.
            schedule_review_prompt(
                store.clone(),
                Arc::new(HeadlessPrompter),
                settings.review_prompt_delay,
            )
            .await
            .context("Review prompt task panicked")?;
        }
    }

    info!(mode = ?flow.mode(), loading = flow.loading(), "Launch flow settled");

    Ok(())
}
