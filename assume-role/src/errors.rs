// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("failed to read MFA code: {0}")]
    PromptError(String),
    #[error("failed to retrieve STS credentials: {0}")]
    IssueError(String),
    #[error("{0}")]
    InvalidCredential(String),
    #[error("failed to write credentials to destination: {0}")]
    OutputError(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        AppError::OutputError(source.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        tracing::error!("{:?}", source);
        AppError::InvalidCredential(format!(
            "failed to marshal credential process output: {source}"
        ))
    }
}
