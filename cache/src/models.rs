// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::CREDENTIAL_VERSION;

/// Output of an AWS CLI `credential_process`.
///
/// Field names follow the AWS CLI contract. `expiration` is kept as the
/// RFC3339 text it was issued with so that serialization round-trips
/// byte-for-byte.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,

    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,

    #[serde(rename = "SessionToken")]
    pub session_token: String,

    #[serde(rename = "Expiration")]
    pub expiration: String,

    #[serde(rename = "Version")]
    pub version: i32,
}

impl CredentialRecord {
    /// Builds a version 1 record expiring at `expiration`.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiration: expiration.to_rfc3339_opts(SecondsFormat::Secs, true),
            version: CREDENTIAL_VERSION,
        }
    }

    /// Parses the RFC3339 expiration timestamp.
    pub fn expiration(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.expiration)
    }

    /// Canonical JSON encoding, the exact bytes that get cached.
    pub fn to_bytes(&self) -> Result<CredentialBytes, serde_json::Error> {
        serde_json::to_vec(self).map(CredentialBytes::new)
    }
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_key_id", &"[REDACTED]")
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("version", &self.version)
            .finish()
    }
}

/// Serialized [`CredentialRecord`] as stored in (and returned from) the cache.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialBytes(Vec<u8>);

impl CredentialBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes the bytes back into a record.
    pub fn to_record(&self) -> Result<CredentialRecord, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }
}

impl fmt::Debug for CredentialBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialBytes([REDACTED; {}])", self.0.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> CredentialRecord {
        let expiration = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        CredentialRecord::new("AKIAEXAMPLE", "secret", "token", expiration)
    }

    #[test]
    fn test_new_formats_rfc3339_utc() {
        let record = sample();
        assert_eq!(record.expiration, "2030-01-02T03:04:05Z");
        assert_eq!(record.version, 1);
    }

    #[test]
    fn test_expiration_parses() {
        let record = sample();
        let expected = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(record.expiration().unwrap(), expected);
    }

    #[test]
    fn test_expiration_rejects_garbage() {
        let mut record = sample();
        record.expiration = "tomorrow".to_string();
        assert!(record.expiration().is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let bytes = sample().to_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(bytes.as_bytes()).unwrap();
        assert_eq!(value["AccessKeyId"], "AKIAEXAMPLE");
        assert_eq!(value["SecretAccessKey"], "secret");
        assert_eq!(value["SessionToken"], "token");
        assert_eq!(value["Expiration"], "2030-01-02T03:04:05Z");
        assert_eq!(value["Version"], 1);
    }

    #[test]
    fn test_bytes_decode_back_to_record() {
        let record = sample();
        let bytes = record.to_bytes().unwrap();
        assert_eq!(bytes.to_record().unwrap(), record);
    }

    #[test]
    fn test_debug_is_redacted() {
        let record = sample();
        let debug = format!("{record:?}");
        assert!(!debug.contains("secret\""));
        assert!(!debug.contains("AKIAEXAMPLE"));
        assert!(debug.contains("[REDACTED]"));

        let bytes = record.to_bytes().unwrap();
        let debug = format!("{bytes:?}");
        assert!(!debug.contains("AKIAEXAMPLE"));
    }
}
