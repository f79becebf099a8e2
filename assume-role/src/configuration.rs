// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::constants::{
    DEFAULT_DURATION_SECONDS, DEFAULT_REGION, DEFAULT_ROLE_SESSION_NAME, MAX_DURATION_SECONDS,
    MAX_ROLE_SESSION_NAME_LENGTH, MIN_DURATION_SECONDS, MIN_ROLE_SESSION_NAME_LENGTH,
};
use crate::errors::AppError;

/// AWS CLI `credential_process` that assumes an IAM role with MFA and caches
/// the result.
#[derive(Debug, Clone, Parser)]
#[command(name = "toolkit-assume-role", author, version, about, long_about = None)]
pub struct ProcessOptions {
    /// ARN of the IAM role to assume
    #[arg(value_name = "ROLE_ARN")]
    pub role_arn: String,
    /// ARN or serial number of the MFA device
    #[arg(long, env("TOOLKIT_MFA_SERIAL"))]
    pub mfa_serial: String,
    /// Profile whose credentials call sts:AssumeRole
    #[arg(long, env("TOOLKIT_PROFILE"))]
    pub profile: String,
    #[arg(long, default_value = DEFAULT_REGION, env("TOOLKIT_REGION"))]
    pub region: String,
    #[arg(long, default_value = DEFAULT_ROLE_SESSION_NAME, env("TOOLKIT_ROLE_SESSION_NAME"))]
    pub role_session_name: String,
    #[arg(long, default_value_t = DEFAULT_DURATION_SECONDS, env("TOOLKIT_DURATION_SECONDS"))]
    pub duration_seconds: u32,
    /// Overrides ~/.aws/toolkit-cache
    #[arg(long, env("TOOLKIT_CACHE_DIR"))]
    pub cache_dir: Option<PathBuf>,
    #[arg(long, default_value = "false", env("TOOLKIT_NO_CACHE"), action = ArgAction::SetTrue)]
    pub no_cache: bool,
    /// Discard cached credentials for the role before running
    #[arg(long, default_value = "false", env("TOOLKIT_REFRESH"), action = ArgAction::SetTrue)]
    pub refresh: bool,
}

impl ProcessOptions {
    /// Checks the constraints clap cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.role_arn.starts_with("arn:") {
            return Err(AppError::ValidationError(format!(
                "{:?} is not a role ARN",
                self.role_arn
            )));
        }

        if self.mfa_serial.trim().is_empty() {
            return Err(AppError::ValidationError(
                "--mfa-serial is required".to_string(),
            ));
        }

        if self.profile.trim().is_empty() {
            return Err(AppError::ValidationError("--profile is required".to_string()));
        }

        if self.region.trim().is_empty() {
            return Err(AppError::ValidationError("--region cannot be empty".to_string()));
        }

        if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&self.duration_seconds) {
            return Err(AppError::ValidationError(format!(
                "--duration-seconds must be between {MIN_DURATION_SECONDS} and {MAX_DURATION_SECONDS}, got {}",
                self.duration_seconds
            )));
        }

        validate_role_session_name(&self.role_session_name)
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            role_arn: String::new(),
            mfa_serial: String::new(),
            profile: String::new(),
            region: DEFAULT_REGION.to_string(),
            role_session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
            duration_seconds: DEFAULT_DURATION_SECONDS,
            cache_dir: None,
            no_cache: false,
            refresh: false,
        }
    }
}

// sts:AssumeRole accepts [\w+=,.@-]{2,64}
fn validate_role_session_name(name: &str) -> Result<(), AppError> {
    let length = name.chars().count();
    if !(MIN_ROLE_SESSION_NAME_LENGTH..=MAX_ROLE_SESSION_NAME_LENGTH).contains(&length) {
        return Err(AppError::ValidationError(format!(
            "--role-session-name must be {MIN_ROLE_SESSION_NAME_LENGTH} to {MAX_ROLE_SESSION_NAME_LENGTH} characters long"
        )));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "_+=,.@-".contains(*c)))
    {
        return Err(AppError::ValidationError(format!(
            "--role-session-name contains invalid character {c:?}"
        )));
    }

    Ok(())
}
