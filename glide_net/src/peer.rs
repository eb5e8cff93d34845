//! UDP endpoint with a background receive thread.
//!
//! The thread owns a clone of the socket and pushes every datagram into a
//! channel; the driving loop drains them with `poll`. Receive uses a read
//! timeout so the thread can observe the shutdown flag; it is joined on
//! drop, never aborted.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel as xch;

/// How long a blocked receive waits before re-checking the shutdown flag.
const RECV_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Largest datagram worth reading; valid records are 2 or 6 bytes and
/// anything longer is malformed regardless of its content.
const MAX_DATAGRAM: usize = 64;

pub struct UdpPeer {
    socket: UdpSocket,
    send_to: SocketAddr,
    rx: xch::Receiver<Vec<u8>>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl UdpPeer {
    /// Bind `listen` for receiving and aim `send` at `send_to`.
    pub fn bind(listen: SocketAddr, send_to: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(listen)?;
        socket.set_read_timeout(Some(RECV_POLL_TIMEOUT))?;
        let recv_socket = socket.try_clone()?;

        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown);

        let join_handle = std::thread::spawn(move || {
            let mut buf = [0u8; MAX_DATAGRAM];
            loop {
                if thread_shutdown.load(Ordering::Relaxed) {
                    break;
                }
                match recv_socket.recv_from(&mut buf) {
                    Ok((len, _from)) => {
                        // If send fails, the peer is gone; exit quietly.
                        if tx.send(buf[..len].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                        ) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "udp receive failed");
                    }
                }
            }
            tracing::trace!("udp receive thread exiting");
        });

        Ok(Self {
            socket,
            send_to,
            rx,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// The address the receive half is actually bound to (port 0 in `bind`
    /// resolves to an ephemeral port).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Next queued datagram, oldest first, if any.
    pub fn poll(&self) -> Option<Vec<u8>> {
        self.rx.try_recv().ok()
    }

    /// Number of datagrams waiting to be polled.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Best-effort send to the configured endpoint. Transport failures are
    /// logged and the record is dropped; the relay never retries.
    pub fn send(&self, payload: &[u8]) {
        if let Err(e) = self.socket.send_to(payload, self.send_to) {
            tracing::warn!(error = %e, "udp send failed; record dropped");
        }
    }
}

impl Drop for UdpPeer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The thread exits at the latest after one receive timeout.
        if let Some(handle) = self.join_handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("udp receive thread panicked during shutdown");
        }
    }
}
