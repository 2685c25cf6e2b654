use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "notebook",
    about = "Evaluate code snippets against a remote /eval service",
    version
)]
pub struct Cli {
    /// Base URL of the evaluation server; `/eval` is appended.
    #[arg(long)]
    pub server: Option<String>,
    /// RON configuration file. Defaults to ./notebook.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Seconds before a pending evaluation is marked as timed out.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Escape service output instead of trusting it as markup.
    #[arg(long)]
    pub plain_text: bool,
    /// Do not send blank editor content.
    #[arg(long)]
    pub reject_empty: bool,
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// Write to ./notebook.log in current directory.
    File,
    /// Write to the terminal. Interleaves with the UI.
    Terminal,
    /// Write to both file and terminal.
    Both,
    Off,
}
