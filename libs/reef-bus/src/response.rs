//! Response decoding for EZO replies
//!
//! Raw replies are a status byte followed by payload characters. The
//! payload bytes arrive with their most significant bit set on the
//! reference hardware; decoding clears it. Downstream devices depend on
//! this exact decode, so it is reproduced bit-for-bit rather than treated
//! as a text-encoding concern.

use crate::error::{BusError, Result};
use std::fmt;

/// Status byte value a circuit sends for a successful reply
const STATUS_OK: u8 = 1;

/// Decoded reply from an EZO circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EzoResponse {
    /// Successful reply payload
    Reading(String),
    /// The circuit reported a failure status; carries the raw status byte
    Fault(u8),
    /// The circuit was put to sleep and will not reply
    Asleep,
}

impl EzoResponse {
    /// Decode a raw reply buffer.
    ///
    /// NUL padding bytes are stripped before the status byte is inspected,
    /// since null-padded fixed-size frames are what i2c-dev hands back. The
    /// first remaining byte is the status code: [`STATUS_OK`] means
    /// success, anything else is a sensor-reported failure and the rest of
    /// the buffer is ignored.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let frame: Vec<u8> = raw.iter().copied().filter(|&b| b != 0).collect();

        let (&status, payload) = frame
            .split_first()
            .ok_or_else(|| BusError::transport("empty reply from device"))?;

        if status == STATUS_OK {
            // MSB cleared on every payload byte; spurious on this hardware
            // family, not part of the character data.
            let text: String = payload.iter().map(|&b| char::from(b & 0x7F)).collect();
            Ok(EzoResponse::Reading(text))
        } else {
            Ok(EzoResponse::Fault(status))
        }
    }

    /// Whether the circuit reported a failure status
    pub fn is_fault(&self) -> bool {
        matches!(self, EzoResponse::Fault(_))
    }

    /// The payload text, if this is a successful reading
    pub fn reading(&self) -> Option<&str> {
        match self {
            EzoResponse::Reading(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for EzoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EzoResponse::Reading(text) => write!(f, "{}", text),
            EzoResponse::Fault(code) => write!(f, "ERR {}", code),
            EzoResponse::Asleep => write!(f, "sleep mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_clears_msb_on_payload() {
        let raw = [1, 0x80 | b'2', 0x80 | b'5', b'.', 0x80 | b'1'];
        let response = EzoResponse::decode(&raw).unwrap();
        assert_eq!(response, EzoResponse::Reading("25.1".to_string()));
    }

    #[test]
    fn test_decode_failure_status_ignores_rest() {
        let raw = [2, 0x80 | b'9', 0x80 | b'9'];
        let response = EzoResponse::decode(&raw).unwrap();
        assert_eq!(response, EzoResponse::Fault(2));
        assert_eq!(response.to_string(), "ERR 2");
        assert!(response.is_fault());
    }

    #[test]
    fn test_decode_strips_nul_padding_before_status() {
        // i2c-dev style fixed-size frame with trailing padding
        let raw = [1, 0x80 | b'7', b'.', 0x80 | b'0', 0, 0, 0, 0];
        let response = EzoResponse::decode(&raw).unwrap();
        assert_eq!(response, EzoResponse::Reading("7.0".to_string()));

        // Padding ahead of the status byte must not shift the decode
        let raw = [0, 0, 254];
        let response = EzoResponse::decode(&raw).unwrap();
        assert_eq!(response, EzoResponse::Fault(254));
    }

    #[test]
    fn test_decode_empty_frame_is_transport_fault() {
        assert!(matches!(
            EzoResponse::decode(&[]),
            Err(BusError::Transport(_))
        ));
        assert!(matches!(
            EzoResponse::decode(&[0, 0, 0]),
            Err(BusError::Transport(_))
        ));
    }

    #[test]
    fn test_display_sentinels() {
        assert_eq!(EzoResponse::Asleep.to_string(), "sleep mode");
        assert_eq!(EzoResponse::Reading("ok".into()).to_string(), "ok");
    }
}
