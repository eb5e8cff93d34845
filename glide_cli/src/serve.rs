//! Device-side relay loop: UDP records → snapshot pacing → dispatcher.
//!
//! Incoming records are drained continuously but only the newest one is
//! kept; it is forwarded to the dispatcher at the configured update rate.
//! This bounds producer flooding before the queue's own coalescing kicks
//! in.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use eyre::{Result, WrapErr};

use glide_core::Command;
use glide_core::config::DeviceCfg;
use glide_core::dispatcher::DeviceDispatcher;
use glide_core::util::period_us;
use glide_device::SimulatedActuator;
use glide_net::{UdpPeer, wire};
use glide_traits::MonotonicClock;

use crate::protocol_from_config;

pub fn run(cfg: &glide_config::Config, run_for: Option<f32>) -> Result<()> {
    let device_cfg = DeviceCfg::from(&cfg.device);
    let adapter = SimulatedActuator::new(protocol_from_config(cfg.device.protocol));
    let (dispatcher, disconnects) =
        DeviceDispatcher::spawn(adapter, device_cfg, MonotonicClock::new());

    let listen: SocketAddr = format!("{}:{}", cfg.network.host, cfg.network.listen_port)
        .parse()
        .wrap_err("bad listen address")?;
    let send_to: SocketAddr = format!("{}:{}", cfg.network.host, cfg.network.send_port)
        .parse()
        .wrap_err("bad send address")?;
    let peer = UdpPeer::bind(listen, send_to).wrap_err("binding relay socket")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .wrap_err("installing Ctrl-C handler")?;

    let poll_period = Duration::from_micros(period_us(cfg.network.poll_rate_hz));
    let update_period = Duration::from_micros(period_us(cfg.network.update_rate_hz));

    tracing::info!(%listen, "relay server listening");

    let started = Instant::now();
    let mut snapshot: Option<wire::MoveRecord> = None;
    let mut last_forward = Instant::now();
    let mut last_target: u8 = 0;

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

        // Drain everything queued; only the newest decodable record counts.
        while let Some(datagram) = peer.poll() {
            match wire::decode(&datagram) {
                Ok(record) => snapshot = Some(record),
                Err(e) => tracing::debug!(error = %e, "dropping malformed datagram"),
            }
        }

        if last_forward.elapsed() >= update_period {
            if let Some(record) = snapshot.take() {
                let duration = record
                    .duration_secs
                    .filter(|d| d.is_finite() && *d >= 0.0)
                    .map_or(Duration::ZERO, Duration::from_secs_f32);
                let cmd = Command::new(last_target, record.position, record.speed, duration);
                last_target = cmd.position_to;
                dispatcher.submit(cmd);
                tracing::trace!(
                    position = record.position,
                    speed = record.speed,
                    "record forwarded"
                );
            }
            last_forward = Instant::now();
        }

        if let Ok(event) = disconnects.try_recv() {
            tracing::error!(reason = %event.reason, "device disconnected; stopping relay");
            break;
        }

        std::thread::sleep(poll_period);
    }

    dispatcher.shutdown().wrap_err("dispatcher shutdown")?;
    Ok(())
}
