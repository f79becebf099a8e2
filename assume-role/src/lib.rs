// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # Assume Role
//!
//! An AWS CLI `credential_process` that assumes an IAM role with MFA and
//! keeps the resulting credentials in the encrypted [`credential_cache`].
//!
//! ## Architecture
//!
//! ```text
//! AWS CLI -> toolkit-assume-role -> CacheStore (hit) -> stdout
//!                    |
//!                    +-> MFA prompt (/dev/tty) -> sts:AssumeRole -> CacheStore::save -> stdout
//! ```
//!
//! ## Modules
//!
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: Defaults and STS limits
//! - [`errors`]: Application error types
//! - [`issuer`]: `sts:AssumeRole` credential issuance
//! - [`process`]: Cache-first credential output
//! - [`prompt`]: MFA token prompt on the terminal
//!
//! ## Usage
//!
//! In `~/.aws/config`:
//!
//! ```ini
//! [profile admin]
//! credential_process = toolkit-assume-role --profile base --mfa-serial arn:aws:iam::123456789012:mfa/me arn:aws:iam::123456789012:role/admin
//! ```

pub mod configuration;
pub mod constants;
pub mod errors;
pub mod issuer;
pub mod process;
pub mod prompt;
