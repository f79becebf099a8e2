// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

pub const BIN_NAME: &str = "toolkit-assume-role";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ROLE_SESSION_NAME: &str = "ToolkitCLI";
pub const DEFAULT_DURATION_SECONDS: u32 = 3600; // 1 hour
/// https://docs.aws.amazon.com/STS/latest/APIReference/API_AssumeRole.html
pub const MIN_DURATION_SECONDS: u32 = 900; // 15 minutes
pub const MAX_DURATION_SECONDS: u32 = 14400; // 4 hours
pub const MIN_ROLE_SESSION_NAME_LENGTH: usize = 2;
pub const MAX_ROLE_SESSION_NAME_LENGTH: usize = 64;
pub const MFA_TOKEN_LENGTH: usize = 6;
pub const MFA_PROMPT: &str = "MFA code";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const TTY_DEVICE: &str = "/dev/tty";
