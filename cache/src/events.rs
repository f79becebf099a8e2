// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Best-effort cache events.
//!
//! Retrieval never fails; everything that goes wrong along the way (a file
//! that cannot be deleted, read, or decrypted) is reported here instead.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Why a cache file was pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// Name does not decode for the identity
    Invalid,
    /// Expires within the safety margin
    AlmostExpired,
    /// Superseded by a file with a later expiration
    Older,
    /// Removed on request
    Invalidated,
    /// Fails authentication under the current key
    Undecryptable,
}

impl PruneReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::AlmostExpired => "almost expired",
            Self::Older => "older",
            Self::Invalidated => "invalidated",
            Self::Undecryptable => "undecryptable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Pruned {
        path: PathBuf,
        reason: PruneReason,
    },
    DeleteFailed {
        path: PathBuf,
        reason: PruneReason,
        error: String,
    },
    ListFailed {
        path: PathBuf,
        error: String,
    },
    ReadFailed {
        path: PathBuf,
        error: String,
    },
    DecryptFailed {
        path: PathBuf,
        error: String,
    },
    Hit {
        path: PathBuf,
        expiration: DateTime<Utc>,
    },
    Miss,
}

impl CacheEvent {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::DeleteFailed { .. }
                | Self::ListFailed { .. }
                | Self::ReadFailed { .. }
                | Self::DecryptFailed { .. }
        )
    }
}

/// Receives cache events. Injected into the store so that callers decide
/// where diagnostics go.
pub trait EventSink: Send + Sync {
    fn record(&self, event: CacheEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn record(&self, event: CacheEvent) {
        match event {
            CacheEvent::Pruned { path, reason } => {
                tracing::debug!(?path, reason = reason.as_str(), "deleted cache file");
            }
            CacheEvent::DeleteFailed {
                path,
                reason,
                error,
            } => {
                tracing::warn!(?path, %error, "failed to delete {} cache file", reason.as_str());
            }
            CacheEvent::ListFailed { path, error } => {
                tracing::warn!(?path, %error, "failed to list cache directory");
            }
            CacheEvent::ReadFailed { path, error } => {
                tracing::warn!(?path, %error, "failed to read active cache file");
            }
            CacheEvent::DecryptFailed { path, error } => {
                tracing::warn!(?path, %error, "failed to decrypt cache file");
            }
            CacheEvent::Hit { path, expiration } => {
                tracing::debug!(?path, %expiration, "cache hit");
            }
            CacheEvent::Miss => tracing::debug!("cache miss"),
        }
    }
}

/// Collects events in memory for inspection in tests.
#[derive(Debug, Default)]
pub struct MemoryEvents {
    events: Mutex<Vec<CacheEvent>>,
}

impl MemoryEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CacheEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn failures(&self) -> Vec<CacheEvent> {
        self.events()
            .into_iter()
            .filter(CacheEvent::is_failure)
            .collect()
    }
}

impl EventSink for MemoryEvents {
    fn record(&self, event: CacheEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn record(&self, event: CacheEvent) {
        (**self).record(event);
    }
}
