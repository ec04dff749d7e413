// src/main.rs

use canvas_dl::{
    cli::{Cli, LogLevel},
    constants,
    error::AppError,
    run_from_cli, symbols,
};
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use log::{error, info, warn};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

fn init_logger(level: LogLevel) {
    let filter = match level {
        LogLevel::Off => return,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    };
    let app_name = clap::crate_name!();

    let log_file_path = match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("Warning: home directory unknown, logging to the temp directory.");
            env::temp_dir().join(app_name).join(constants::LOG_FILE_NAME)
        }
    };
    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("Warning: could not create log directory {:?}: {}", dir, e);
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "Warning: could not open log file {:?}: {}. Trying a fallback.",
                log_file_path, e
            );
            let fallback_path =
                env::temp_dir().join(format!("{}-{}", app_name, constants::LOG_FALLBACK_FILE_NAME));
            match fern::log_file(&fallback_path) {
                Ok(file) => file,
                Err(e_fb) => {
                    eprintln!(
                        "Error: no log file could be opened ({:?}: {}). Logging disabled.",
                        fallback_path, e_fb
                    );
                    return;
                }
            }
        }
    };

    let result = fern::Dispatch::new()
        .level(filter)
        // Retry and connection chatter from the HTTP stack drowns the useful lines.
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(file_appender)
        .apply();
    if let Err(e) = result {
        eprintln!("Warning: logger initialisation failed: {}", e);
    }
}

fn spawn_interrupt_handler(cancellation_token: Arc<AtomicBool>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Could not listen for Ctrl+C: {}", e);
                return;
            }
            if cancellation_token.load(Ordering::Relaxed) {
                println!("\nSecond interrupt, exiting now.");
                warn!("Second Ctrl+C, forcing exit");
                std::process::exit(130);
            }
            println!(
                "\n{} Stopping after the running downloads. Press {} again to exit immediately.",
                *symbols::WARN,
                *symbols::CTRL_C
            );
            warn!("Interrupt requested with Ctrl+C");
            cancellation_token.store(true, Ordering::Relaxed);
        }
    });
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    let after_help = format!(
        "Examples:\n  # List the courses your token can see\n  {bin} list\n\n  # Download two courses into ./out\n  {bin} download \"Intro To X\" \"Advanced Y\"\n\n  # Download every course again, overwriting local copies\n  {bin} download all --force -o ~/canvas\n\n  # How to get an access token\n  {bin} token-help",
        bin = clap::crate_name!()
    );
    let matches = Cli::command().after_help(after_help).get_matches();
    let args = match Cli::from_arg_matches(&matches) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };
    init_logger(args.log_level);

    let cancellation_token = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(cancellation_token.clone());

    if let Err(e) = run_from_cli(args, cancellation_token).await {
        match e {
            AppError::UserInterrupt => {
                warn!("Interrupted by user");
                std::process::exit(130);
            }
            AppError::Unauthorized { .. } => {
                error!("Stopped on an authorization failure: {}", e);
                eprintln!("\n{} {}", *symbols::ERROR, e.to_string().red());
                eprintln!(
                    "{} Check your access token, see `{} token-help`.",
                    *symbols::INFO,
                    clap::crate_name!()
                );
                std::process::exit(1);
            }
            _ => {
                error!("Run failed: {}", e);
                eprintln!("\n{} {}", *symbols::ERROR, format!("Error: {}", e).red());
                std::process::exit(1);
            }
        }
    }
    info!("Finished");
}
