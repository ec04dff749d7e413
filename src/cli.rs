// src/cli.rs

use crate::constants;
use clap::{Args, Parser, Subcommand, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// Log file verbosity
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    // --- Connection ---
    /// Canvas access token, takes precedence over CANVAS_TOKEN and the config file
    #[arg(long, global = true, help_heading = "Connection")]
    pub token: Option<String>,
    /// Canvas host, e.g. 'canvas.example.ac.uk' or 'https://canvas.example.ac.uk'
    #[arg(long, global = true, value_name = "URL", help_heading = "Connection")]
    pub base_url: Option<String>,

    // --- Options ---
    /// File listing extensions that are never downloaded (one per line)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub ignore_file: Option<PathBuf>,
    /// Maximum number of concurrent file downloads
    #[arg(short, long, global = true, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,

    /// (hidden) log file verbosity, for debugging
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download files of the selected courses (all courses when none are given)
    Download(DownloadArgs),
    /// List the courses visible to the access token
    List,
    /// Show how to create a Canvas access token and exit
    TokenHelp,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Course names to download, matched ignoring case and whitespace; 'all' selects every course
    #[arg(value_name = "COURSE")]
    pub courses: Vec<String>,
    /// Text file with one course name per line
    #[arg(short, long, value_name = "FILE")]
    pub requirements_file: Option<PathBuf>,
    /// Re-download files that already exist locally
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub force: bool,
    /// Directory the course folders are created in
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_SAVE_DIR))]
    pub output: PathBuf,
}

impl Cli {
    pub fn download_args(&self) -> Option<&DownloadArgs> {
        match &self.command {
            Command::Download(args) => Some(args),
            _ => None,
        }
    }
}
