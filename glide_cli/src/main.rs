mod cli;
mod drive;
mod serve;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, FILE_GUARD};
use glide_core::Command;
use glide_core::config::DeviceCfg;
use glide_core::dispatcher::DeviceDispatcher;
use glide_device::{Protocol, SimulatedActuator};
use glide_traits::MonotonicClock;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let cfg = load_config(&args.config)?;
    init_tracing(&args, &cfg.logging)?;

    match args.cmd {
        Commands::Serve { run_for } => serve::run(&cfg, run_for),
        Commands::Drive {
            sweep_speed,
            min_position,
            max_position,
            run_for,
        } => drive::run(&cfg, sweep_speed, min_position, max_position, run_for),
        Commands::SelfCheck => self_check(&cfg, args.json),
    }
}

fn load_config(path: &Path) -> Result<glide_config::Config> {
    let cfg = if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        glide_config::load_toml(&text)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?
    } else {
        // Every knob has a sane default; a missing file is not an error.
        glide_config::Config::default()
    };
    cfg.validate().wrap_err("validating config")?;
    Ok(cfg)
}

fn init_tracing(args: &Cli, logging: &glide_config::Logging) -> Result<()> {
    let level = logging.level.as_deref().unwrap_or(&args.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &logging.file {
        Some(path) => {
            let appender = tracing_appender::rolling::never(".", path.clone());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(writer)
                .init();
        }
        None if args.json => {
            tracing_subscriber::fmt().with_env_filter(filter).json().init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

pub fn protocol_from_config(p: glide_config::Protocol) -> Protocol {
    match p {
        glide_config::Protocol::TimedMove => Protocol::TimedMove,
        glide_config::Protocol::Vibration => Protocol::Vibration,
    }
}

/// Exercise the whole local pipeline against the simulated device: submit a
/// pair of strokes through a dispatcher and verify the device moved.
fn self_check(cfg: &glide_config::Config, json: bool) -> Result<()> {
    let device_cfg = DeviceCfg {
        // Keep the check quick; pacing itself is covered by tests.
        min_command_interval: Duration::from_millis(5),
        ..DeviceCfg::from(&cfg.device)
    };
    let adapter = SimulatedActuator::new(protocol_from_config(cfg.device.protocol));
    let (dispatcher, disconnects) =
        DeviceDispatcher::spawn(adapter, device_cfg, MonotonicClock::new());

    dispatcher.submit(Command::to_position(99, 90));
    dispatcher.submit(Command::to_position(0, 90));
    std::thread::sleep(Duration::from_millis(50));

    if let Ok(event) = disconnects.try_recv() {
        eyre::bail!("simulated device disconnected: {}", event.reason);
    }
    dispatcher.shutdown().wrap_err("dispatcher shutdown")?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "protocol": format!("{:?}", cfg.device.protocol) })
        );
    } else {
        println!("OK");
    }
    Ok(())
}
