// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::path::PathBuf;

use crate::models::CredentialBytes;

/// Failure to bring up the cache. Callers should continue without caching.
#[derive(thiserror::Error, Debug)]
pub enum CacheInitError {
    #[error("cache initialization failure: could not locate user home directory")]
    HomeDirUnavailable,
    #[error("cache initialization failure: failed to locate cache directory {path:?}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cache initialization failure: failed to create cache directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cache initialization failure: {0:?} already exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("cache initialization failure: {0}")]
    Key(#[from] KeyError),
    #[error("cache initialization failure: {0}")]
    Cipher(#[from] CipherError),
}

/// Failure to obtain the cache encryption key.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum KeyError {
    #[error("failed to retrieve encryption key: secret exists but cannot be read: {0}")]
    Unavailable(String),
    #[error("saved encryption key has been corrupted: {0}")]
    Corrupt(String),
    #[error("failed to generate encryption key")]
    Generate,
    #[error("failed to save newly generated encryption key: {0}")]
    Persist(String),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CipherError {
    #[error("cipher failure: failed to initialize AES-256-GCM key")]
    Construction,
    #[error("cipher failure: failed to initialize nonce")]
    Nonce,
    #[error("cipher failure: failed to seal plaintext")]
    Seal,
    #[error("cipher failure: ciphertext too short: {0} bytes")]
    TooShort(usize),
    #[error("cipher failure: AES-GCM authentication failure, the data have been tampered")]
    Authentication,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("{0:?} is not of the right cache file name format")]
    Format(String),
    #[error("numeric portion of {0:?} is not a valid Unix second")]
    Timestamp(String),
}

/// Error returned by [`CacheStore::save`](crate::store::CacheStore::save).
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    /// The record itself is unusable. Never retry, never cache.
    #[error("invalid AWS credential: {0}")]
    InvalidCredential(String),
    /// The record is fine but could not be cached. `contents` is the
    /// serialized record and is safe to hand to the caller.
    #[error("failed to save cache file: {source}")]
    CacheWrite {
        contents: CredentialBytes,
        source: CacheWriteError,
    },
}

impl SaveError {
    /// Serialized record carried by a recoverable write failure.
    pub fn contents(&self) -> Option<&CredentialBytes> {
        match self {
            Self::InvalidCredential(_) => None,
            Self::CacheWrite { contents, .. } => Some(contents),
        }
    }

    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, Self::InvalidCredential(_))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CacheWriteError {
    #[error("failed to encrypt before saving: {0}")]
    Encrypt(#[from] CipherError),
    #[error("failed to write {path:?} to disk: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
