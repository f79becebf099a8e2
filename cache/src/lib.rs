// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Credential Cache
//!
//! A local, encrypted, time-bounded cache for short-lived AWS credentials
//! produced by `sts:AssumeRole`. It lets a `credential_process` command skip
//! the MFA-gated STS call while a previously issued credential is still
//! valid, without ever writing credentials to disk in plaintext.
//!
//! ## Architecture
//!
//! ```text
//! caller -> CacheStore -> naming (file names)
//!                 |
//!                 +-> AesGcm (contents) <- KeySource (OS secret store)
//! ```
//!
//! ## Modules
//!
//! - [`cipher`]: AES-256-GCM with a random nonce per file
//! - [`constants`]: Key sizes, expiry margin, default locations
//! - [`errors`]: Error types for initialization, key custody, cipher and save
//! - [`events`]: Injected sink for best-effort diagnostics
//! - [`keys`]: Cache key custody backed by the OS credential store
//! - [`models`]: The cached credential record and its serialized form
//! - [`naming`]: `<prefix>-<unix seconds>` file name codec
//! - [`store`]: Save / retrieve / prune
//!
//! ## Usage
//!
//! ```no_run
//! use credential_cache::events::TracingEvents;
//! use credential_cache::keys::KeyCustodian;
//! use credential_cache::store::CacheStore;
//!
//! let store = CacheStore::open_default(&KeyCustodian::keyring(), TracingEvents)?;
//! if let Some(cached) = store.retrieve("arn:aws:iam::123456789012:role/admin") {
//!     println!("{}", String::from_utf8_lossy(cached.as_bytes()));
//! }
//! # Ok::<(), credential_cache::errors::CacheInitError>(())
//! ```
//!
//! ## Security Considerations
//!
//! - One key protects every cache file and never touches the cache directory
//! - Files are written owner read/write only (0600), the directory 0700
//! - Tampered or foreign files fail authentication and read as a miss
//! - Files expiring within 10 minutes are never returned

pub mod cipher;
pub mod constants;
pub mod errors;
pub mod events;
pub mod keys;
pub mod models;
pub mod naming;
pub mod store;
pub mod utils;
