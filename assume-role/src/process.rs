// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::io::Write;

use credential_cache::errors::SaveError;
use credential_cache::events::TracingEvents;
use credential_cache::keys::KeySource;
use credential_cache::store::CacheStore;

use crate::configuration::ProcessOptions;
use crate::errors::AppError;
use crate::issuer::CredentialIssuer;

/// Opens the cache selected by `options`, or `None` when caching is disabled
/// or unavailable. A cache that cannot be opened never stops the command.
pub fn open_cache(options: &ProcessOptions, keys: &dyn KeySource) -> Option<CacheStore> {
    if options.no_cache {
        tracing::debug!("[assume-role] cache disabled");
        return None;
    }

    let opened = match &options.cache_dir {
        Some(dir) => CacheStore::open(dir.clone(), keys, TracingEvents),
        None => CacheStore::open_default(keys, TracingEvents),
    };

    match opened {
        Ok(cache) => Some(cache),
        Err(err) => {
            tracing::warn!("[assume-role] cache mode off: {}", err);
            None
        }
    }
}

/// Serves one `credential_process` invocation for a role.
pub struct Processor<I> {
    role_arn: String,
    cache: Option<CacheStore>,
    issuer: I,
}

impl<I: CredentialIssuer> Processor<I> {
    pub fn new(role_arn: impl Into<String>, cache: Option<CacheStore>, issuer: I) -> Self {
        Self {
            role_arn: role_arn.into(),
            cache,
            issuer,
        }
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// Drops every cached credential of the role.
    pub fn refresh(&self) -> usize {
        let removed = self
            .cache
            .as_ref()
            .map_or(0, |cache| cache.invalidate(&self.role_arn));
        tracing::debug!("[assume-role] removed {} cache files", removed);
        removed
    }

    /// Writes the `credential_process` JSON for the role to `dest`, from the
    /// cache when possible.
    #[tracing::instrument(skip(self, dest), fields(role_arn = %self.role_arn))]
    pub async fn run(&self, dest: &mut impl Write) -> Result<(), AppError> {
        if let Some(cached) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.retrieve(&self.role_arn))
        {
            return write_output(dest, cached.as_bytes());
        }

        let record = self.issuer.issue().await?;

        let output = match &self.cache {
            Some(cache) => match cache.save(&self.role_arn, &record) {
                Ok(contents) => contents,
                Err(err @ SaveError::InvalidCredential(_)) => {
                    return Err(AppError::InvalidCredential(err.to_string()));
                }
                Err(SaveError::CacheWrite { contents, source }) => {
                    tracing::warn!("[assume-role] {}", source);
                    contents
                }
            },
            None => record.to_bytes()?,
        };

        write_output(dest, output.as_bytes())
    }
}

fn write_output(dest: &mut impl Write, output: &[u8]) -> Result<(), AppError> {
    dest.write_all(output)?;
    dest.flush()?;
    Ok(())
}
