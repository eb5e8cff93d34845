//! Loopback behavior of the UDP peer pair.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use glide_net::wire;
use glide_net::UdpPeer;

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Bind a producer/server pair on ephemeral ports wired at each other.
fn peer_pair() -> (UdpPeer, UdpPeer) {
    // Bind the server first on an ephemeral port, then aim the producer at
    // whatever the OS picked.
    let server = UdpPeer::bind(loopback(0), loopback(9)).expect("bind server");
    let server_addr = server.local_addr().expect("server addr");
    let producer = UdpPeer::bind(loopback(0), server_addr).expect("bind producer");
    (producer, server)
}

fn poll_until(peer: &UdpPeer, timeout: Duration) -> Option<Vec<u8>> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(datagram) = peer.poll() {
            return Some(datagram);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    None
}

#[test]
fn timed_record_crosses_the_wire_byte_exact() {
    let (producer, server) = peer_pair();

    producer.send(&wire::encode_timed(42, 17, 0.250));

    let datagram = poll_until(&server, Duration::from_secs(2)).expect("datagram");
    let record = wire::decode(&datagram).expect("decode");
    assert_eq!(record.position, 42);
    assert_eq!(record.speed, 17);
    assert_eq!(record.duration_secs, Some(0.250f32));
}

#[test]
fn short_records_and_garbage_share_the_wire() {
    let (producer, server) = peer_pair();

    producer.send(&wire::encode_short(10, 20));
    producer.send(&[1, 2, 3]); // malformed: receivers drop it at decode
    producer.send(&wire::encode_short(30, 40));

    let mut decoded = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(2);
    while decoded.len() < 3 && Instant::now() < deadline {
        if let Some(datagram) = poll_until(&server, Duration::from_millis(500)) {
            decoded.push(wire::decode(&datagram));
        }
    }

    let ok: Vec<_> = decoded.iter().filter(|r| r.is_ok()).collect();
    let bad: Vec<_> = decoded.iter().filter(|r| r.is_err()).collect();
    assert_eq!(ok.len(), 2);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0], &Err(wire::WireError::BadLength(3)));
}

#[test]
fn drop_joins_the_receive_thread_promptly() {
    let (producer, server) = peer_pair();
    drop(producer);

    let start = Instant::now();
    drop(server);
    // One receive-timeout period plus scheduling headroom.
    assert!(
        start.elapsed() < Duration::from_millis(500),
        "drop took {:?}",
        start.elapsed()
    );
}
