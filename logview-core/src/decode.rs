use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;

// Same leniency as a browser's atob: padding optional, stray low bits ignored.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("log message is not valid base64: {0}")]
pub struct DecodeError(#[from] pub base64::DecodeError);

/// ASCII whitespace anywhere in the message is skipped.
pub fn decode_message_bytes(message: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: Vec<u8> = message.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(FORGIVING.decode(compact)?)
}

/// Decode a wire message into display text. Invalid UTF-8 is replaced, not rejected.
pub fn decode_message(message: &str) -> Result<String, DecodeError> {
    let bytes = decode_message_bytes(message)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn encode_message(raw: &[u8]) -> String {
    STANDARD.encode(raw)
}

/// Byte length a well-formed message decodes to, without decoding it.
pub fn decoded_len(message: &str) -> usize {
    let symbols = message.bytes().filter(|b| *b != b'=' && !b.is_ascii_whitespace()).count();
    symbols * 3 / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_text() {
        assert_eq!(decode_message("Ym9vbQ==").unwrap(), "boom");
        assert_eq!(decode_message("").unwrap(), "");
    }

    #[test]
    fn round_trip_preserves_bytes() {
        let raw: &[u8] = b"\x1b[31mfailed\x1b[0m \xff\x00 tail";
        let encoded = encode_message(raw);
        assert_eq!(decode_message_bytes(&encoded).unwrap(), raw);
    }

    #[test]
    fn decoded_len_matches_decoding() {
        let cases: [&[u8]; 6] = [b"", b"a", b"ab", b"abc", b"abcd", b"\x1b[31mboom\x1b[0m"];
        for raw in cases {
            assert_eq!(decoded_len(&encode_message(raw)), raw.len());
        }
        assert_eq!(decoded_len("=="), 0);
    }

    #[test]
    fn accepts_missing_padding_and_whitespace() {
        assert_eq!(decode_message("Ym9vbQ").unwrap(), "boom");
        assert_eq!(decode_message("Ym9v bQ==").unwrap(), "boom");
        assert_eq!(decode_message(" Ym9v\r\nbQ\t").unwrap(), "boom");
        assert_eq!(decode_message("b2s").unwrap(), "ok");
        assert_eq!(decoded_len("Ym9v bQ"), 4);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(decode_message("not base64!").is_err());
        assert!(decode_message("Ym9vb").is_err());
    }
}
