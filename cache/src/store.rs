// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Encrypted on-disk credential cache.
//!
//! [`CacheStore`] owns a flat directory of files named by
//! [`encode_file_name`], each holding one AES-256-GCM encrypted
//! [`CredentialRecord`].
//!
//! # Retrieval
//!
//! 1. List the files matching `<prefix>-*` for the identity
//! 2. Delete files whose name does not decode, or that expire within
//!    [`EXPIRY_SAFETY_MARGIN_SECS`]
//! 3. Keep the file with the latest expiration, delete the rest
//! 4. Read and decrypt the survivor, deleting it if it fails authentication
//!
//! Any failure in steps 1 or 4 is a cache miss, never an error. Failed
//! deletions are reported and left for the next retrieval.
//!
//! # Concurrency
//!
//! There is no locking. Processes racing on the same identity may leave
//! duplicate files behind; the next retrieval collapses them.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};

use crate::cipher::AesGcm;
use crate::constants::{CACHE_DIR_NAME, CACHE_DIR_PARENT, EXPIRY_SAFETY_MARGIN_SECS};
use crate::errors::{CacheInitError, CacheWriteError, SaveError};
use crate::events::{CacheEvent, EventSink, PruneReason};
use crate::keys::KeySource;
use crate::models::{CredentialBytes, CredentialRecord};
use crate::naming::{decode_file_name, encode_file_name, has_prefix, identity_prefix};

struct CacheFile {
    expiration: DateTime<Utc>,
    path: PathBuf,
}

pub struct CacheStore {
    dir: PathBuf,
    cipher: AesGcm,
    events: Box<dyn EventSink>,
}

impl CacheStore {
    /// Opens (creating if needed) the cache in `dir`.
    ///
    /// The key is resolved exactly once, here.
    ///
    /// # Errors
    ///
    /// Any [`CacheInitError`]. Callers are expected to carry on without a
    /// cache rather than abort.
    pub fn open(
        dir: impl Into<PathBuf>,
        keys: &dyn KeySource,
        events: impl EventSink + 'static,
    ) -> Result<Self, CacheInitError> {
        let dir = dir.into();
        ensure_dir(&dir)?;

        let key = keys.resolve()?;
        let cipher = AesGcm::new(&key)?;

        Ok(Self {
            dir,
            cipher,
            events: Box::new(events),
        })
    }

    /// Opens the cache in `~/.aws/toolkit-cache`.
    pub fn open_default(
        keys: &dyn KeySource,
        events: impl EventSink + 'static,
    ) -> Result<Self, CacheInitError> {
        Self::open(default_dir()?, keys, events)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encrypts and stores `record` for `identity`.
    ///
    /// Returns the serialized record, which is what callers should emit.
    ///
    /// # Errors
    ///
    /// - [`SaveError::InvalidCredential`] if the expiration is not RFC3339 or
    ///   the record cannot be serialized. Nothing is written.
    /// - [`SaveError::CacheWrite`] if encryption or the disk write failed. The
    ///   serialized record is still carried in the error and is valid.
    #[tracing::instrument(skip(self, record))]
    pub fn save(
        &self,
        identity: &str,
        record: &CredentialRecord,
    ) -> Result<CredentialBytes, SaveError> {
        let expiration = record.expiration().map_err(|err| {
            SaveError::InvalidCredential(format!(
                "expiration {:?} is not of the right format: {err}",
                record.expiration
            ))
        })?;

        let contents = record.to_bytes().map_err(|err| {
            SaveError::InvalidCredential(format!("failed to serialize credential record: {err}"))
        })?;

        let path = self.dir.join(encode_file_name(identity, &expiration));

        let encrypted = match self.cipher.encrypt(contents.as_bytes()) {
            Ok(encrypted) => encrypted,
            Err(err) => {
                return Err(SaveError::CacheWrite {
                    contents,
                    source: err.into(),
                });
            }
        };

        if let Err(source) = write_private(&path, &encrypted) {
            return Err(SaveError::CacheWrite {
                contents,
                source: CacheWriteError::Io { path, source },
            });
        }

        tracing::debug!(?path, "saved cache file");

        Ok(contents)
    }

    /// Returns the cached record for `identity`, or `None` on a miss.
    ///
    /// Prunes invalid, almost expired and superseded files as a side effect.
    #[tracing::instrument(skip(self))]
    pub fn retrieve(&self, identity: &str) -> Option<CredentialBytes> {
        let threshold = Utc::now() + TimeDelta::seconds(EXPIRY_SAFETY_MARGIN_SECS);

        let paths = match self.matching_files(identity) {
            Ok(paths) => paths,
            Err(err) => {
                self.events.record(CacheEvent::ListFailed {
                    path: self.dir.clone(),
                    error: err.to_string(),
                });
                return None;
            }
        };

        let mut actives: Vec<CacheFile> = Vec::with_capacity(paths.len());

        for path in paths {
            let decoded = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| decode_file_name(identity, name));

            match decoded {
                Some(Ok(expiration)) if expiration >= threshold => {
                    actives.push(CacheFile { expiration, path });
                }
                Some(Ok(_)) => self.delete(&path, PruneReason::AlmostExpired),
                _ => self.delete(&path, PruneReason::Invalid),
            }
        }

        actives.sort_by_key(|file| file.expiration);

        let Some(winner) = actives.pop() else {
            self.events.record(CacheEvent::Miss);
            return None;
        };

        for older in &actives {
            self.delete(&older.path, PruneReason::Older);
        }

        let encrypted = match fs::read(&winner.path) {
            Ok(encrypted) => encrypted,
            Err(err) => {
                self.events.record(CacheEvent::ReadFailed {
                    path: winner.path,
                    error: err.to_string(),
                });
                return None;
            }
        };

        match self.cipher.decrypt(&encrypted) {
            Ok(plaintext) => {
                self.events.record(CacheEvent::Hit {
                    path: winner.path,
                    expiration: winner.expiration,
                });
                Some(CredentialBytes::new(plaintext))
            }
            Err(err) => {
                self.events.record(CacheEvent::DecryptFailed {
                    path: winner.path.clone(),
                    error: err.to_string(),
                });
                // undecryptable under this key forever, and would otherwise
                // shadow files saved later with an earlier expiration
                self.delete(&winner.path, PruneReason::Undecryptable);
                None
            }
        }
    }

    /// Deletes every cache file of `identity`, valid or not. Returns how many
    /// were removed.
    #[tracing::instrument(skip(self))]
    pub fn invalidate(&self, identity: &str) -> usize {
        let paths = match self.matching_files(identity) {
            Ok(paths) => paths,
            Err(err) => {
                self.events.record(CacheEvent::ListFailed {
                    path: self.dir.clone(),
                    error: err.to_string(),
                });
                return 0;
            }
        };

        paths
            .iter()
            .filter(|path| self.try_delete(path, PruneReason::Invalidated))
            .count()
    }

    /// Paths in the cache directory named `<prefix>-*` for `identity`.
    fn matching_files(&self, identity: &str) -> io::Result<Vec<PathBuf>> {
        let prefix = identity_prefix(identity);
        let mut paths = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|name| has_prefix(name, &prefix)) {
                paths.push(entry.path());
            }
        }

        Ok(paths)
    }

    fn delete(&self, path: &Path, reason: PruneReason) {
        self.try_delete(path, reason);
    }

    fn try_delete(&self, path: &Path, reason: PruneReason) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                self.events.record(CacheEvent::Pruned {
                    path: path.to_path_buf(),
                    reason,
                });
                true
            }
            Err(err) => {
                self.events.record(CacheEvent::DeleteFailed {
                    path: path.to_path_buf(),
                    reason,
                    error: err.to_string(),
                });
                false
            }
        }
    }
}

/// `~/.aws/toolkit-cache`
pub fn default_dir() -> Result<PathBuf, CacheInitError> {
    dirs::home_dir()
        .map(|home| home.join(CACHE_DIR_PARENT).join(CACHE_DIR_NAME))
        .ok_or(CacheInitError::HomeDirUnavailable)
}

fn ensure_dir(dir: &Path) -> Result<(), CacheInitError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(CacheInitError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o700);
            }
            builder
                .create(dir)
                .map_err(|source| CacheInitError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
        }
        Err(source) => Err(CacheInitError::Stat {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Writes `contents` to `path` readable by the owner only.
///
/// The data goes to a hidden temporary file first and is renamed into place,
/// so a concurrent reader sees either nothing or the complete file. The
/// temporary name never matches a cache file pattern.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid cache file name"))?;
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

    let result = (|| -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}
