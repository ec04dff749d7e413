// src/ui.rs

use crate::{constants, symbols};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", *symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *symbols::ERROR, message.red());
}

/// Course listing used by the `list` command.
pub fn print_course_table(rows: &[(u64, String, Option<String>)]) {
    let id_width = rows
        .iter()
        .map(|(id, _, _)| id.to_string().len())
        .max()
        .unwrap_or(1);
    for (id, name, code) in rows {
        let code = code
            .as_deref()
            .map(|c| format!(" ({})", c).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "  [{}] {}{}",
            format!("{:>width$}", id, width = id_width).yellow(),
            name,
            code
        );
    }
}

pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    pbar.set_style(style);
    pbar.set_prefix(prefix.to_string());
    pbar
}
