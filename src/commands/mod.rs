//! CLI commands

mod conversation_commands;
mod progress_commands;
mod render;

use crate::config::MonitorConfig;
use crate::conversations::ExportFormat;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "progress-monitor")]
#[command(about = "Watch processing jobs and manage conversations on the assistant backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend origin (overrides PROGRESS_MONITOR_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow a processing job until it finishes and download its results
    Watch {
        /// Processing job id
        job_id: String,
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Poll a processing job once and print the snapshot as JSON
    Status {
        /// Processing job id
        job_id: String,
    },

    /// Start processing the selected satellites' data
    Start {
        /// Conversation the request belongs to
        #[arg(long)]
        conversation: String,
        /// Satellite name (repeatable)
        #[arg(long = "satellite", required = true)]
        satellites: Vec<String>,
        /// Processing options as a JSON object
        #[arg(long)]
        options: Option<String>,
        /// Watch the started job
        #[arg(long)]
        watch: bool,
        #[command(flatten)]
        watch_args: WatchArgs,
    },

    /// Manage conversations
    #[command(subcommand)]
    Conversations(ConversationCommands),
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Directory for downloaded results (overrides PROGRESS_MONITOR_OUTPUT_DIR)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Do not download results on completion
    #[arg(long)]
    pub no_download: bool,
    /// Also download the bundled result package
    #[arg(long)]
    pub package: bool,
    /// Log status changes instead of drawing a progress bar
    #[arg(long)]
    pub plain: bool,
}

#[derive(Subcommand)]
pub enum ConversationCommands {
    /// List conversations, most recently updated first
    List {
        #[arg(long, default_value = "20")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Print a conversation's messages
    Show { conversation_id: String },
    /// Rename a conversation
    Rename { conversation_id: String, title: String },
    /// Delete a conversation
    Delete { conversation_id: String },
    /// Create an empty conversation
    Create { conversation_id: String },
    /// Export a conversation
    Export {
        conversation_id: String,
        #[arg(long, value_enum, default_value = "markdown")]
        format: ExportFormat,
        /// Title to use instead of the listed one (custom or derived from the first message)
        #[arg(long)]
        title: Option<String>,
        /// Output file; `-` for stdout. Defaults to `<id>.<ext>`
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = MonitorConfig::from_env().context("invalid PROGRESS_MONITOR_* environment")?;
    if let Some(base) = &cli.api_base {
        config = config.with_api_base(base)?;
    }

    match cli.command {
        Commands::Watch { job_id, watch } => progress_commands::watch(config, &job_id, &watch).await,
        Commands::Status { job_id } => progress_commands::status(&config, &job_id).await,
        Commands::Start {
            conversation,
            satellites,
            options,
            watch,
            watch_args,
        } => {
            progress_commands::start(
                config,
                conversation,
                satellites,
                options.as_deref(),
                watch.then_some(&watch_args),
            )
            .await
        }
        Commands::Conversations(command) => conversation_commands::run(&config, command).await,
    }
}
