//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "glide", version, about = "Motion-to-actuator relay")]
pub struct Cli {
    /// Path to config TOML (defaults are used when the file is absent)
    #[arg(long, value_name = "FILE", default_value = "etc/glide.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Receive motion records over UDP and drive the device
    Serve {
        /// Exit after this many seconds instead of waiting for Ctrl-C
        #[arg(long, value_name = "SECS")]
        run_for: Option<f32>,
    },
    /// Generate procedural motion and stream records to a serve process
    Drive {
        /// Sweep rate of the procedural source, device units per second
        #[arg(long, value_name = "UNITS_PER_SEC", default_value_t = 120.0)]
        sweep_speed: f32,
        /// Lower end of the sweep (0..=99)
        #[arg(long, value_name = "POS", default_value_t = 0.0)]
        min_position: f32,
        /// Upper end of the sweep (0..=99)
        #[arg(long, value_name = "POS", default_value_t = 99.0)]
        max_position: f32,
        /// Exit after this many seconds instead of waiting for Ctrl-C
        #[arg(long, value_name = "SECS")]
        run_for: Option<f32>,
    },
    /// Quick health check (config + simulated device round trip)
    SelfCheck,
}
