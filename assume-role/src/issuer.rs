// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sts::config::Region;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::types::Credentials;
use chrono::DateTime;
use credential_cache::models::CredentialRecord;

use crate::configuration::ProcessOptions;
use crate::errors::AppError;
use crate::prompt::TokenPrompt;

/// Produces a fresh credential when the cache has none.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self) -> Result<CredentialRecord, AppError>;
}

/// Calls `sts:AssumeRole` with an MFA token read from `P`.
pub struct StsIssuer<P> {
    client: aws_sdk_sts::Client,
    role_arn: String,
    role_session_name: String,
    duration_seconds: i32,
    mfa_serial: String,
    prompt: P,
}

impl<P: TokenPrompt> StsIssuer<P> {
    /// Loads the shared AWS configuration for `--profile` and `--region`.
    pub async fn from_options(options: &ProcessOptions, prompt: P) -> Result<Self, AppError> {
        let duration_seconds = i32::try_from(options.duration_seconds)
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&options.profile)
            .region(Region::new(options.region.clone()))
            .load()
            .await;

        Ok(Self {
            client: aws_sdk_sts::Client::new(&config),
            role_arn: options.role_arn.clone(),
            role_session_name: options.role_session_name.clone(),
            duration_seconds,
            mfa_serial: options.mfa_serial.clone(),
            prompt,
        })
    }
}

#[async_trait]
impl<P: TokenPrompt> CredentialIssuer for StsIssuer<P> {
    #[tracing::instrument(skip(self), fields(role_arn = %self.role_arn))]
    async fn issue(&self) -> Result<CredentialRecord, AppError> {
        let token_code = self.prompt.token()?;

        let output = self
            .client
            .assume_role()
            .role_arn(&self.role_arn)
            .role_session_name(&self.role_session_name)
            .duration_seconds(self.duration_seconds)
            .serial_number(&self.mfa_serial)
            .token_code(token_code)
            .send()
            .await
            .map_err(|e| AppError::IssueError(DisplayErrorContext(&e).to_string()))?;

        let credentials = output
            .credentials()
            .ok_or_else(|| AppError::IssueError("response contained no credentials".to_string()))?;

        tracing::debug!(
            "[assume-role] issued credentials expiring at unix second {}",
            credentials.expiration().secs()
        );

        into_record(credentials)
    }
}

fn into_record(credentials: &Credentials) -> Result<CredentialRecord, AppError> {
    let expiration = credentials.expiration();
    let expiration =
        DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos()).ok_or_else(|| {
            AppError::InvalidCredential(format!(
                "invalid AWS credential: expiration at unix second {} is out of range",
                expiration.secs()
            ))
        })?;

    Ok(CredentialRecord::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        credentials.session_token(),
        expiration,
    ))
}
