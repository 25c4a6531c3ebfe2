//! Wire framing for the ExaPlay text-line protocol.
//!
//! The wire format is strictly "text up to the terminator": commands go out
//! as UTF-8 terminated with CR, replies come back as UTF-8 terminated with
//! CRLF. There are no length prefixes and no escaping.

use crate::error::CodecError;

/// Reply terminator on the wire.
pub const REPLY_TERMINATOR: &[u8] = b"\r\n";

/// Encode a command string into its wire frame.
///
/// Appends the CR command terminator and returns the UTF-8 bytes. The
/// command must not contain embedded line terminators; ExaPlay treats the
/// first CR as end of command.
pub fn encode_command(command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(command.len() + 1);
    frame.extend_from_slice(command.as_bytes());
    frame.push(b'\r');
    frame
}

/// Decode a raw reply frame into its string payload.
///
/// Expects the frame to end with CRLF, strips it, and UTF-8 decodes the
/// rest.
pub fn decode_reply(frame: &[u8]) -> Result<String, CodecError> {
    let payload = frame
        .strip_suffix(REPLY_TERMINATOR)
        .ok_or(CodecError::MissingTerminator)?;

    String::from_utf8(payload.to_vec()).map_err(|_| CodecError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_appends_cr() {
        assert_eq!(encode_command("play,comp1"), b"play,comp1\r");
        assert_eq!(encode_command(""), b"\r");
    }

    #[test]
    fn test_decode_strips_crlf() {
        assert_eq!(decode_reply(b"OK\r\n").unwrap(), "OK");
        assert_eq!(decode_reply(b"1,15.65,939,2,300.0\r\n").unwrap(), "1,15.65,939,2,300.0");
        assert_eq!(decode_reply(b"\r\n").unwrap(), "");
    }

    #[test]
    fn test_decode_requires_terminator() {
        assert_eq!(decode_reply(b"OK"), Err(CodecError::MissingTerminator));
        // A bare CR is not a complete reply frame.
        assert_eq!(decode_reply(b"OK\r"), Err(CodecError::MissingTerminator));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert_eq!(decode_reply(b"\xff\xfe\r\n"), Err(CodecError::InvalidUtf8));
    }

    #[test]
    fn test_round_trip() {
        // Encode a command, then decode the device-crafted reply for it.
        let frame = encode_command("get:status,comp1");
        assert_eq!(frame, b"get:status,comp1\r");
        assert_eq!(decode_reply(b"OK\r\n").unwrap(), "OK");
    }
}
