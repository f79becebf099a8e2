// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! MFA token input.
//!
//! The AWS CLI captures both stdout and stderr of a `credential_process`, so
//! the prompt talks to the controlling terminal directly. Stderr is used only
//! when no terminal device can be opened.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use dialoguer::Input;
use dialoguer::console::Term;

use crate::constants::{MFA_PROMPT, MFA_TOKEN_LENGTH, TTY_DEVICE};
use crate::errors::AppError;

pub trait TokenPrompt: Send + Sync {
    /// Returns a six digit MFA token code.
    fn token(&self) -> Result<String, AppError>;
}

/// Asks the user on the controlling terminal.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    device: PathBuf,
}

impl TerminalPrompt {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    fn terminal(&self) -> Term {
        match open_device(&self.device) {
            #[cfg(unix)]
            Ok((read, write)) => Term::read_write_pair(read, write),
            #[cfg(not(unix))]
            Ok(_) => Term::stderr(),
            Err(err) => {
                tracing::debug!(
                    "[assume-role] cannot open {:?}, prompting on stderr: {}",
                    self.device,
                    err
                );
                Term::stderr()
            }
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new(TTY_DEVICE)
    }
}

impl TokenPrompt for TerminalPrompt {
    fn token(&self) -> Result<String, AppError> {
        let input: String = Input::new()
            .with_prompt(MFA_PROMPT)
            .interact_text_on(&self.terminal())
            .map_err(|e| AppError::PromptError(e.to_string()))?;

        normalize_token(&input)
    }
}

/// Opens `path` read/write, returning independent read and write handles.
fn open_device(path: &Path) -> io::Result<(File, File)> {
    let read = OpenOptions::new().read(true).write(true).open(path)?;
    let write = read.try_clone()?;
    Ok((read, write))
}

pub fn normalize_token(input: &str) -> Result<String, AppError> {
    let token = input.trim();
    if token.len() != MFA_TOKEN_LENGTH || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::PromptError(format!(
            "MFA code must be {MFA_TOKEN_LENGTH} digits"
        )));
    }
    Ok(token.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dialoguer::console::TermTarget;
    use std::io::Write;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_token(" 012345\n").unwrap(), "012345");
    }

    #[test]
    fn test_normalize_rejects_bad_codes() {
        for input in ["", "12345", "1234567", "12a456", "123 456"] {
            assert!(
                matches!(normalize_token(input), Err(AppError::PromptError(_))),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_default_device_is_controlling_terminal() {
        assert_eq!(TerminalPrompt::default().device(), Path::new("/dev/tty"));
    }

    #[test]
    fn test_open_device_is_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tty");
        std::fs::write(&path, b"").unwrap();

        let (_read, mut write) = open_device(&path).unwrap();
        write.write_all(b"MFA code: ").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"MFA code: ");
    }

    #[cfg(unix)]
    #[test]
    fn test_prompt_uses_device_instead_of_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tty");
        std::fs::write(&path, b"").unwrap();

        let term = TerminalPrompt::new(&path).terminal();

        assert!(matches!(term.target(), TermTarget::ReadWritePair(_)));
    }

    #[test]
    fn test_missing_device_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let term = TerminalPrompt::new(dir.path().join("missing")).terminal();

        assert!(matches!(term.target(), TermTarget::Stderr));
    }
}
