// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const FILENAME_TRUNCATE_LENGTH: usize = 65;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "out";
pub const DEFAULT_IGNORE_FILE: &str = ".scrapeignore";
pub const DEFAULT_BASE_URL: &str = "https://canvas.bham.ac.uk";
pub const DEFAULT_WORKERS: usize = 3;
pub const ALL_COURSES_KEYWORD: &str = "all";
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub const TOKEN_ENV_VAR: &str = "CANVAS_TOKEN";
pub const BASE_URL_ENV_VAR: &str = "CANVAS_BASE_URL";

pub mod api {
    /// Canvas caps this server-side; pagination is followed regardless.
    pub const PER_PAGE: &str = "1000";
    /// Relative, so a base URL with a path prefix keeps it.
    pub const COURSES_PATH: &str = "api/v1/courses";
    pub const MAX_PAGES: usize = 1000;

    pub mod endpoints {
        pub const MODULES: &str = "modules";
        pub const FILES: &str = "files";
    }

    pub mod url_markers {
        pub const QUIZ: &str = "/quizzes/";
        pub const PAGE: &str = "/pages/";
        pub const FILES: &str = "files";
        pub const API: &str = "api";
    }

    pub mod status {
        pub const UNAUTHORIZED: &[&str] = &["unauthorized", "unauthorised"];
    }
}

pub const HELP_TOKEN_GUIDE: &str = r#"
1. Log in to your Canvas instance in a browser.
2. Open "Account" -> "Settings".
3. Under "Approved Integrations" click "+ New Access Token".
4. Give it a purpose (e.g. "canvas-dl") and optionally an expiry date.
5. Copy the generated token; Canvas shows it only once.
6. Pass it with --token, export it as CANVAS_TOKEN, or store it as
   "accesstoken" in ~/.canvas-dl/config.json."#;
