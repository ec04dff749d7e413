// src/lib.rs

pub mod canvas;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod models;
pub mod requester;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    canvas::{CanvasApi, courses::unmatched_filters},
    cli::{Cli, Command, DownloadArgs},
    client::RobustClient,
    config::AppConfig,
    downloader::{CourseScraper, DownloadManager},
    error::{AppError, AppResult},
    requester::Requester,
};
use colored::*;
use log::{debug, info, warn};
use std::{
    fs,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// State shared by every course walk and download worker of a run.
#[derive(Clone)]
pub struct ScrapeContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub api: CanvasApi,
    pub cancellation_token: Arc<AtomicBool>,
}

impl ScrapeContext {
    /// Builds the requester and HTTP client from the configuration.
    pub fn new(
        config: Arc<AppConfig>,
        token: Option<&str>,
        ignore_extensions: Vec<String>,
        cancellation_token: Arc<AtomicBool>,
    ) -> AppResult<Self> {
        let requester = Arc::new(Requester::from_config(&config, token, ignore_extensions)?);
        let http_client = Arc::new(RobustClient::new(config.clone())?);
        let api = CanvasApi::new(http_client.clone(), requester, config.clone());
        Ok(Self {
            manager: DownloadManager::new(),
            config,
            http_client,
            api,
            cancellation_token,
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.load(Ordering::Relaxed)
    }
}

/// Library entry point called by `main.rs`.
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);
    if matches!(args.command, Command::TokenHelp) {
        ui::box_message(
            "Creating a Canvas access token",
            constants::HELP_TOKEN_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        println!(
            "\n{} Keep the token private, it grants full access to your account.",
            *symbols::INFO
        );
        return Ok(());
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("Effective configuration: {:?}", config);

    let (token_opt, source) =
        config::token::resolve_token(args.token.as_deref(), config.config_token.as_deref());
    if token_opt.is_some() {
        info!("Access token loaded from {}", source);
        println!("\n{} Access token loaded from {}.", *symbols::INFO, source);
    } else {
        info!("No access token found");
        return Err(AppError::Config(format!(
            "no access token found; pass --token, set {} or run `{} token-help`",
            constants::TOKEN_ENV_VAR,
            clap::crate_name!()
        )));
    }

    let ignore_extensions = config::ignore::load_ignore_list(args.ignore_file.as_deref())?;
    let context = ScrapeContext::new(
        config,
        token_opt.as_deref(),
        ignore_extensions,
        cancellation_token,
    )?;

    match &args.command {
        Command::List => list_courses(&context).await,
        Command::Download(download_args) => download_courses(&context, download_args).await,
        Command::TokenHelp => Ok(()),
    }
}

async fn list_courses(context: &ScrapeContext) -> AppResult<()> {
    let courses = context.api.list_courses(&[]).await?;
    ui::print_header(&format!("Courses on {}", context.config.base_url));
    if courses.is_empty() {
        ui::info("No courses are visible to this access token.");
        return Ok(());
    }
    let rows: Vec<_> = courses
        .iter()
        .map(|c| (c.id, c.name.clone(), c.course_code.clone()))
        .collect();
    ui::print_course_table(&rows);
    Ok(())
}

/// Positional names plus the requirements file; a leading `all` means no filter.
pub fn collect_course_filters(args: &DownloadArgs) -> AppResult<Vec<String>> {
    let mut filters: Vec<String> = args
        .courses
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if filters
        .first()
        .is_some_and(|f| f.eq_ignore_ascii_case(constants::ALL_COURSES_KEYWORD))
    {
        return Ok(Vec::new());
    }
    if let Some(path) = &args.requirements_file {
        filters.extend(config::ignore::load_requirements(path)?);
    }
    Ok(filters)
}

async fn download_courses(context: &ScrapeContext, args: &DownloadArgs) -> AppResult<()> {
    let filters = collect_course_filters(args)?;

    let output_dir = &context.config.output_dir;
    fs::create_dir_all(output_dir)?;
    let absolute_path = dunce::canonicalize(output_dir)?;
    info!("Saving files under \"{}\"", absolute_path.display());
    println!(
        "\n{} Saving files under \"{}\"",
        *symbols::INFO,
        absolute_path.display()
    );

    let courses = context.api.list_courses(&filters).await?;
    for missing in unmatched_filters(&courses, &filters) {
        warn!("No course matches '{}'", missing);
        ui::warn(&format!("No course matches '{}'", missing));
    }
    if courses.is_empty() {
        ui::info("No courses selected, nothing to do.");
        return Ok(());
    }

    ui::print_header(&format!(
        "Scraping {} courses (press {} to stop)",
        courses.len(),
        *symbols::CTRL_C
    ));
    let scraper = CourseScraper::new(context.clone());
    let mut interrupted = false;
    for course in &courses {
        if context.is_cancelled() {
            interrupted = true;
            break;
        }
        if let Err(e) = scraper.run(course).await {
            match e {
                AppError::UserInterrupt => {
                    interrupted = true;
                    break;
                }
                other => return Err(other),
            }
        }
    }

    context.manager.print_report();
    if interrupted {
        return Err(AppError::UserInterrupt);
    }
    Ok(())
}
