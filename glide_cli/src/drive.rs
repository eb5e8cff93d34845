//! Producer-side relay loop: procedural motion → zone detector → UDP.
//!
//! The oscillator stands in for a tracked scene object; its positions run
//! through the same detector a live target would, and every emitted signal
//! leaves as a timed record.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use eyre::{Result, WrapErr};

use glide_core::config::SignalCfg;
use glide_core::motion::Oscillator;
use glide_core::translator;
use glide_core::zone::{CaptureZone, ZoneSignalDetector};
use glide_net::{UdpPeer, wire};

pub fn run(
    cfg: &glide_config::Config,
    sweep_speed: f32,
    min_position: f32,
    max_position: f32,
    run_for: Option<f32>,
) -> Result<()> {
    let zone = CaptureZone::from(&cfg.zone);
    let signal_cfg = SignalCfg::from(&cfg.signal);
    let mut detector = ZoneSignalDetector::new(signal_cfg, zone);
    let mut source = Oscillator::new(min_position, max_position, sweep_speed);

    // Mirror image of the server's endpoints: we listen where it sends.
    let listen: SocketAddr = format!("{}:{}", cfg.network.host, cfg.network.send_port)
        .parse()
        .wrap_err("bad listen address")?;
    let send_to: SocketAddr = format!("{}:{}", cfg.network.host, cfg.network.listen_port)
        .parse()
        .wrap_err("bad send address")?;
    let peer = UdpPeer::bind(listen, send_to).wrap_err("binding producer socket")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .wrap_err("installing Ctrl-C handler")?;

    let tick = Duration::from_secs_f32(1.0 / signal_cfg.sample_rate_hz.max(1.0));
    tracing::info!(%send_to, sweep_speed, "streaming procedural motion");

    let started = Instant::now();
    let mut last_emitted: f32 = 0.0;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            tracing::info!("shutdown requested");
            break;
        }
        if let Some(secs) = run_for
            && started.elapsed() >= Duration::from_secs_f32(secs.max(0.0))
        {
            break;
        }

        let dt = tick.as_secs_f32();
        let travel = source.tick(dt);
        if let Some(signal) = detector.update(zone.point_at(travel), dt) {
            let distance = (f32::from(signal.position) - last_emitted).abs();
            let duration =
                translator::duration_for_move(distance, f32::from(signal.speed).max(1.0));
            peer.send(&wire::encode_timed(signal.position, signal.speed, duration));
            last_emitted = f32::from(signal.position);
            tracing::debug!(
                position = signal.position,
                speed = signal.speed,
                duration,
                "signal sent"
            );
        }

        std::thread::sleep(tick);
    }

    Ok(())
}
