//! Per-device dispatch loop.
//!
//! Each dispatcher owns one background thread that drains the device's
//! command queue and paces adapter writes so the firmware never sees two
//! commands closer together than its minimum interval.
//!
//! Shutdown is cooperative only: closing the queue unblocks a pending
//! dequeue, then the thread is joined with a bounded timeout. A thread that
//! fails to stop in time is reported as an error, never killed — aborting
//! it mid-adapter-write could leave the device in a corrupt state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel as xch;
use glide_traits::Actuator;
use glide_traits::clock::Clock;

use crate::command::{Command, commands_are_similar};
use crate::config::DeviceCfg;
use crate::error::RelayError;
use crate::queue::CommandQueue;

/// Raised at most once per dispatcher lifetime when the adapter fails.
/// The producer side should stop emitting for this device until it is
/// re-bound.
#[derive(Debug, Clone)]
pub struct DisconnectEvent {
    pub reason: String,
}

pub struct DeviceDispatcher {
    queue: Arc<CommandQueue>,
    enabled: Arc<AtomicBool>,
    done_rx: xch::Receiver<()>,
    join_handle: Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl DeviceDispatcher {
    /// Start the dispatch thread for `adapter` and hand back the dispatcher
    /// plus the receiver its disconnect notification arrives on.
    pub fn spawn<A, C>(adapter: A, cfg: DeviceCfg, clock: C) -> (Self, xch::Receiver<DisconnectEvent>)
    where
        A: Actuator + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let queue = Arc::new(CommandQueue::new());
        let enabled = Arc::new(AtomicBool::new(true));
        let (done_tx, done_rx) = xch::bounded(1);
        let (disconnect_tx, disconnect_rx) = xch::bounded(1);

        let loop_queue = Arc::clone(&queue);
        let loop_enabled = Arc::clone(&enabled);
        let join_handle = std::thread::spawn(move || {
            dispatch_loop(adapter, &loop_queue, &loop_enabled, cfg, &clock, &disconnect_tx);
            let _ = done_tx.send(());
        });

        (
            Self {
                queue,
                enabled,
                done_rx,
                join_handle: Some(join_handle),
                join_timeout: cfg.join_timeout,
            },
            disconnect_rx,
        )
    }

    /// Producer-facing entry point: coalesce against pending similar
    /// commands using the default predicate.
    pub fn submit(&self, cmd: Command) {
        self.queue.enqueue_replacing(cmd, commands_are_similar);
    }

    /// Like [`Self::submit`] with a caller-supplied similarity predicate.
    pub fn submit_with<F>(&self, cmd: Command, is_similar: F)
    where
        F: Fn(&Command, &Command) -> bool,
    {
        self.queue.enqueue_replacing(cmd, is_similar);
    }

    /// While disabled, dequeued commands are discarded instead of executed.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Number of commands waiting to be dispatched.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The underlying queue, for producers that enqueue directly.
    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    /// Close the queue and join the dispatch thread.
    ///
    /// Disabling the device is not sufficient to stop the thread — it would
    /// stay blocked in `dequeue`. Failing to join within the configured
    /// timeout is a fatal condition surfaced to the caller; the thread is
    /// left to finish on its own rather than being killed.
    pub fn shutdown(mut self) -> Result<(), RelayError> {
        self.queue.close();
        let handle = match self.join_handle.take() {
            Some(h) => h,
            None => return Ok(()),
        };
        match self.done_rx.recv_timeout(self.join_timeout) {
            Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    tracing::warn!("dispatch thread panicked during shutdown");
                }
                Ok(())
            }
            Err(xch::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    timeout_ms = self.join_timeout.as_millis() as u64,
                    "dispatch thread failed to stop; leaving it detached"
                );
                drop(handle);
                Err(RelayError::ShutdownTimeout(self.join_timeout))
            }
        }
    }
}

impl Drop for DeviceDispatcher {
    fn drop(&mut self) {
        // Best-effort cleanup for dispatchers dropped without `shutdown`.
        self.queue.close();
        if let Some(handle) = self.join_handle.take() {
            match self.done_rx.recv_timeout(self.join_timeout) {
                Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => {
                    if handle.join().is_err() {
                        tracing::warn!("dispatch thread panicked during drop");
                    }
                }
                Err(xch::RecvTimeoutError::Timeout) => {
                    tracing::error!("dispatch thread still running at drop; leaving it detached");
                }
            }
        }
    }
}

fn dispatch_loop<A, C>(
    mut adapter: A,
    queue: &CommandQueue,
    enabled: &AtomicBool,
    cfg: DeviceCfg,
    clock: &C,
    disconnect: &xch::Sender<DisconnectEvent>,
) where
    A: Actuator,
    C: Clock,
{
    while let Some(entry) = queue.dequeue() {
        if !enabled.load(Ordering::Acquire) {
            // Disabled devices drop commands; they are not executed later.
            continue;
        }

        let started = clock.now();
        let waited = started.saturating_duration_since(entry.submitted_at);
        if waited > cfg.acceptable_execution_delay {
            tracing::warn!(
                delay_ms = waited.as_millis() as u64,
                "command execution delay"
            );
        }

        let cmd = entry.command;
        if let Err(e) = adapter.set_command(cmd.position_to, cmd.speed, cmd.duration) {
            tracing::error!(error = %e, "adapter write failed; disconnecting");
            if let Err(stop_err) = adapter.stop() {
                tracing::debug!(error = %stop_err, "adapter stop failed during disconnect");
            }
            let _ = disconnect.try_send(DisconnectEvent {
                reason: e.to_string(),
            });
            queue.close();
            break;
        }

        let elapsed = clock.now().saturating_duration_since(started);
        if elapsed < cfg.min_command_interval {
            clock.sleep(cfg.min_command_interval - elapsed);
        }
    }
    tracing::debug!("dispatch loop exiting");
}
