// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// AES-256 key length in bytes
pub const KEY_SIZE: usize = 32;

/// AES-GCM nonce length in bytes, prepended to every cache file
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes, appended to every cache file
pub const TAG_LEN: usize = 16;

/// Number of lowercase hex characters kept from the identity digest
pub const PREFIX_LEN: usize = 7;

/// Cache files expiring within this many seconds are treated as expired
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 10 * 60; // 10 minutes

/// Credential record format version understood by the AWS CLI
pub const CREDENTIAL_VERSION: i32 = 1;

// Secret store entry holding the base64 encoded cache key
pub const KEYRING_SERVICE: &str = "kxue43.toolkit.assume-role";
pub const KEYRING_ACCOUNT: &str = "cache-encryption-key";

// Default cache directory, relative to the user's home directory
pub const CACHE_DIR_PARENT: &str = ".aws";
pub const CACHE_DIR_NAME: &str = "toolkit-cache";
