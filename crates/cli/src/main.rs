// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw: reconcile application cronjobs against a cluster

mod commands;
mod config;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::cronjob::{AddArgs, UpdateArgs};
use commands::deploy::DeployArgs;
use commands::Context;
use config::Config;
use exit_error::{ExitError, EXIT_FAILURE};
use output::OutputFormat;
use std::path::PathBuf;
use tokio::runtime::Builder;

#[derive(Parser)]
#[command(
    name = "cw",
    version,
    about = "Reconcile application cronjobs against a cluster"
)]
struct Cli {
    /// Configuration file
    #[arg(
        long,
        global = true,
        env = "CW_CONFIG",
        default_value = "cronwarden.toml"
    )]
    config: PathBuf,
    /// App to act on (default: the only configured app)
    #[arg(long, global = true)]
    app: Option<String>,
    /// Acting subject for permission checks (default: CW_SUBJECT or USER)
    #[arg(long, global = true)]
    subject: Option<String>,
    #[arg(long, short = 'o', global = true, value_enum, default_value_t)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the app's cronjobs with an image
    Deploy(DeployArgs),
    /// Show what deploy would change without touching the cluster
    Plan(DeployArgs),
    /// Create or update one cronjob with the app's current image
    Add(AddArgs),
    /// List the app's deployed cronjobs
    List,
    /// Change fields of a deployed cronjob
    Update(UpdateArgs),
    /// Delete a cronjob
    Delete { name: String },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match EnvFilter::try_new(env::log_filter()) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config).map_err(ExitError::from)?;
    let ctx = Context {
        config,
        app: cli.app,
        subject: cli.subject.unwrap_or_else(env::subject),
        format: cli.output,
    };

    match cli.command {
        Command::Deploy(args) => commands::deploy::deploy(&ctx, args).await,
        Command::Plan(args) => commands::deploy::plan(&ctx, args).await,
        Command::Add(args) => commands::cronjob::add(&ctx, args).await,
        Command::List => commands::cronjob::list(&ctx).await,
        Command::Update(args) => commands::cronjob::update(&ctx, args).await,
        Command::Delete { name } => commands::cronjob::delete(&ctx, &name).await,
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    if let Err(err) = runtime.block_on(run(cli)) {
        let code = err
            .downcast_ref::<ExitError>()
            .map_or(EXIT_FAILURE, |e| e.code);
        eprintln!("error: {:#}", err);
        std::process::exit(code);
    }
}
