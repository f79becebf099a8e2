// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::process::ExitCode;

use assume_role::configuration::ProcessOptions;
use assume_role::constants::{BIN_NAME, DEFAULT_LOG_FILTER};
use assume_role::issuer::StsIssuer;
use assume_role::process::{Processor, open_cache};
use assume_role::prompt::TerminalPrompt;
use clap::Parser;
use credential_cache::keys::KeyCustodian;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        // stdout carries the credential_process output
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let options = ProcessOptions::parse();

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{BIN_NAME}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: ProcessOptions) -> anyhow::Result<()> {
    options.validate()?;

    tracing::debug!("[assume-role] {:?}", &options);

    let cache = open_cache(&options, &KeyCustodian::keyring());
    let issuer = StsIssuer::from_options(&options, TerminalPrompt::default()).await?;
    let processor = Processor::new(options.role_arn.clone(), cache, issuer);

    if options.refresh {
        processor.refresh();
    }

    let mut stdout = std::io::stdout().lock();
    processor.run(&mut stdout).await?;

    Ok(())
}
