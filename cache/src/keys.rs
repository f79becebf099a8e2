// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Custody of the cache encryption key.
//!
//! The key is 32 random bytes, stored base64 encoded as a single secret in the
//! operating system's credential store (Keychain on macOS, Credential Manager
//! on Windows, the kernel keyring on Linux). It is created on first use and
//! read on every later run.
//!
//! # Security
//!
//! - A stored secret that does not decode to exactly [`KEY_SIZE`] bytes is
//!   reported as corrupt. It is never silently replaced, since that would
//!   orphan every existing cache file.
//! - Key material is zeroized on drop and redacted from `Debug` output.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use aws_lc_rs::rand::{SecureRandom, SystemRandom};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::{KEY_SIZE, KEYRING_ACCOUNT, KEYRING_SERVICE};
use crate::errors::KeyError;
use crate::utils::{base64_decode, base64_encode};

/// The 32-byte AES-256 key protecting every cache file.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; KEY_SIZE]);

impl CipherKey {
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh key from the system CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; KEY_SIZE];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| KeyError::Generate)?;
        let key = Self(bytes);
        bytes.zeroize();
        Ok(key)
    }

    fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let decoded = Zeroizing::new(
            base64_decode(encoded).map_err(|err| KeyError::Corrupt(err.to_string()))?,
        );

        let bytes: [u8; KEY_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            KeyError::Corrupt(format!(
                "saved encryption key has length {} while {} is required",
                decoded.len(),
                KEY_SIZE
            ))
        })?;

        Ok(Self(bytes))
    }

    fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(base64_encode(&self.0))
    }

    pub fn expose(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey([REDACTED])")
    }
}

/// Anything that can hand out the cache key.
///
/// Resolved once when a [`CacheStore`](crate::store::CacheStore) is opened.
pub trait KeySource {
    fn resolve(&self) -> Result<CipherKey, KeyError>;
}

/// A key known up front. Useful for tests and for callers that manage the
/// key themselves.
#[derive(Debug, Clone)]
pub struct StaticKey(CipherKey);

impl StaticKey {
    pub fn new(key: CipherKey) -> Self {
        Self(key)
    }
}

impl KeySource for StaticKey {
    fn resolve(&self) -> Result<CipherKey, KeyError> {
        Ok(self.0.clone())
    }
}

/// Minimal string-secret storage addressed by `(service, account)`.
pub trait SecretStore {
    /// Returns `Ok(None)` when no secret exists for the pair.
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeyError>;

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeyError>;
}

/// The operating system's native credential store.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringStore;

impl SecretStore for KeyringStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeyError> {
        let entry = keyring::Entry::new(service, account)
            .map_err(|e| KeyError::Unavailable(e.to_string()))?;

        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(KeyError::Unavailable(e.to_string())),
        }
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeyError> {
        let entry = keyring::Entry::new(service, account)
            .map_err(|e| KeyError::Persist(e.to_string()))?;

        entry
            .set_password(secret)
            .map_err(|e| KeyError::Persist(e.to_string()))
    }
}

/// In-memory secret store for testing.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<HashMap<(String, String), String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a secret, e.g. to simulate an existing or corrupt entry.
    pub fn insert(&self, service: &str, account: &str, secret: &str) {
        if let Ok(mut secrets) = self.secrets.lock() {
            secrets.insert((service.to_string(), account.to_string()), secret.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.secrets.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, KeyError> {
        let secrets = self
            .secrets
            .lock()
            .map_err(|e| KeyError::Unavailable(e.to_string()))?;
        Ok(secrets
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), KeyError> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|e| KeyError::Persist(e.to_string()))?;
        secrets.insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }
}

/// Reads the cache key from a [`SecretStore`], generating and persisting one
/// on first use.
#[derive(Debug)]
pub struct KeyCustodian<S> {
    store: S,
    service: String,
    account: String,
}

impl KeyCustodian<KeyringStore> {
    /// Custodian backed by the OS credential store under the default entry.
    pub fn keyring() -> Self {
        Self::new(KeyringStore, KEYRING_SERVICE, KEYRING_ACCOUNT)
    }
}

impl<S: SecretStore> KeyCustodian<S> {
    pub fn new(store: S, service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            store,
            service: service.into(),
            account: account.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: SecretStore> KeySource for KeyCustodian<S> {
    #[tracing::instrument(skip(self), fields(service = %self.service, account = %self.account))]
    fn resolve(&self) -> Result<CipherKey, KeyError> {
        if let Some(secret) = self.store.get(&self.service, &self.account)? {
            let secret = Zeroizing::new(secret);
            return CipherKey::from_base64(&secret);
        }

        tracing::debug!("no cache encryption key found, generating a new one");

        let key = CipherKey::generate()?;
        self.store
            .set(&self.service, &self.account, &key.to_base64())?;

        Ok(key)
    }
}
