//! URL-safe, padding-free base64 used for addresses and request payloads.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::TypeError;

/// Encode bytes as base64url without padding.
pub fn encode_to_string(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a base64url string without padding.
pub fn decode_string(encoded: &str) -> Result<Vec<u8>, TypeError> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| TypeError::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_url_safe_and_unpadded() {
        let encoded = encode_to_string(&[0xfb, 0xff, 0xfe, 0x01]);
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert_eq!(decode_string(&encoded).unwrap(), vec![0xfb, 0xff, 0xfe, 0x01]);
    }

    #[test]
    fn rejects_standard_alphabet() {
        assert!(decode_string("+/==").is_err());
    }
}
