// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Cache file naming.
//!
//! Every cache file is named `<prefix>-<unix seconds>`, where `<prefix>` is the
//! first [`PREFIX_LEN`] hex characters of the SHA-1 digest of the identity
//! (the role ARN). The expiration lives in the name so that stale files can
//! be pruned without decrypting them.
//!
//! ```text
//! 3f78685-1767225600
//! ^^^^^^^ ^^^^^^^^^^
//! prefix  expiration
//! ```
//!
//! Decoding is scoped to an identity: a well-formed name that belongs to a
//! different identity is rejected. The prefix is a namespace, not a security
//! boundary, and prefix collisions between identities are accepted.

use chrono::{DateTime, Utc};

use crate::constants::PREFIX_LEN;
use crate::errors::NameError;
use crate::utils::sha1_hex;

/// Short, deterministic prefix identifying all cache files of `identity`.
pub fn identity_prefix(identity: &str) -> String {
    let mut digest = sha1_hex(identity.as_bytes());
    digest.truncate(PREFIX_LEN);
    digest
}

/// Name of the cache file holding a credential for `identity` that expires at
/// `expiration`. Sub-second precision is dropped.
pub fn encode_file_name<Tz: chrono::TimeZone>(identity: &str, expiration: &DateTime<Tz>) -> String {
    format!("{}-{}", identity_prefix(identity), expiration.timestamp())
}

/// Recovers the expiration encoded in `file_name`, provided the name belongs
/// to `identity`.
pub fn decode_file_name(identity: &str, file_name: &str) -> Result<DateTime<Utc>, NameError> {
    let prefix = identity_prefix(identity);

    let digits = file_name
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| NameError::Format(file_name.to_string()))?;

    digits
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| NameError::Timestamp(file_name.to_string()))
}

/// Glob-equivalent filter: does `file_name` look like it could belong to
/// `prefix`? Full validation is left to [`decode_file_name`].
pub(crate) fn has_prefix(file_name: &str, prefix: &str) -> bool {
    file_name
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-'))
}
