// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_lc_rs::digest;
use data_encoding::{BASE64, DecodeError, HEXLOWER};

#[inline]
pub fn base64_encode(input: &[u8]) -> String {
    BASE64.encode(input)
}

#[inline]
pub fn base64_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64.decode(input.as_bytes())
}

/// Lowercase hex SHA-1 digest of `input`.
///
/// Only used to derive short, stable file name prefixes; never as a
/// security primitive.
#[inline]
pub fn sha1_hex(input: &[u8]) -> String {
    let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, input);
    HEXLOWER.encode(digest.as_ref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        let input = "SFBLRQARAAIAAg==";
        let actual = base64_decode(input).unwrap();
        assert_eq!(actual, b"HPKE\x00\x11\x00\x02\x00\x02");
    }

    #[test]
    fn test_base64_decode_rejects_garbage() {
        assert!(base64_decode("not base64!").is_err());
    }

    #[test]
    fn test_base64_encode() {
        assert_eq!(base64_encode(&[0u8; 3]), "AAAA");
    }

    #[test]
    fn test_sha1_hex_known_vector() {
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }
}
