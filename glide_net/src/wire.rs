//! Datagram record layout shared by both ends of the relay.
//!
//! One datagram carries exactly one record; there is no framing or length
//! prefix, so the datagram length is the discriminator:
//!
//! ```text
//! 2 bytes: [position: u8][speed: u8]
//! 6 bytes: [position: u8][speed: u8][duration: f32 little-endian seconds]
//! ```
//!
//! Receivers must validate the length before parsing and discard anything
//! else.

use thiserror::Error;

pub const SHORT_RECORD_LEN: usize = 2;
pub const TIMED_RECORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unexpected record length: {0} bytes")]
    BadLength(usize),
}

/// A decoded motion record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord {
    pub position: u8,
    pub speed: u8,
    /// Present only in the 6-byte timed form.
    pub duration_secs: Option<f32>,
}

/// Legacy/simple form: position and speed only.
pub fn encode_short(position: u8, speed: u8) -> [u8; SHORT_RECORD_LEN] {
    [position, speed]
}

/// Extended form carrying timed-move semantics.
pub fn encode_timed(position: u8, speed: u8, duration_secs: f32) -> [u8; TIMED_RECORD_LEN] {
    let mut buf = [0u8; TIMED_RECORD_LEN];
    buf[0] = position;
    buf[1] = speed;
    buf[2..].copy_from_slice(&duration_secs.to_le_bytes());
    buf
}

/// Parse one datagram. Anything that is not exactly a short or timed record
/// is malformed.
pub fn decode(datagram: &[u8]) -> Result<MoveRecord, WireError> {
    match datagram.len() {
        SHORT_RECORD_LEN => Ok(MoveRecord {
            position: datagram[0],
            speed: datagram[1],
            duration_secs: None,
        }),
        TIMED_RECORD_LEN => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&datagram[2..]);
            Ok(MoveRecord {
                position: datagram[0],
                speed: datagram[1],
                duration_secs: Some(f32::from_le_bytes(raw)),
            })
        }
        n => Err(WireError::BadLength(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn timed_record_round_trips_byte_exact() {
        let encoded = encode_timed(42, 17, 0.250);
        let decoded = decode(&encoded).expect("decode");
        assert_eq!(decoded.position, 42);
        assert_eq!(decoded.speed, 17);
        // IEEE-754 float32 equality, not approximate.
        assert_eq!(decoded.duration_secs, Some(0.250f32));
        assert_eq!(encode_timed(42, 17, 0.250), encoded);
    }

    #[test]
    fn short_record_round_trips() {
        let decoded = decode(&encode_short(99, 0)).expect("decode");
        assert_eq!(
            decoded,
            MoveRecord {
                position: 99,
                speed: 0,
                duration_secs: None
            }
        );
    }

    #[test]
    fn duration_bytes_are_little_endian() {
        let encoded = encode_timed(0, 0, 1.0);
        assert_eq!(&encoded[2..], &[0x00u8, 0x00, 0x80, 0x3F][..]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(64)]
    fn other_lengths_are_malformed(#[case] len: usize) {
        let datagram = vec![0u8; len];
        assert_eq!(decode(&datagram), Err(WireError::BadLength(len)));
    }
}
