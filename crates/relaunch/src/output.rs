//! Terminal output utilities

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn stdout_line(mark: StyledObject<&str>, msg: &str) {
    println!("{} {}", mark.bold(), msg);
}

fn stderr_line(mark: StyledObject<&str>, msg: &str) {
    eprintln!("{} {}", mark.bold(), msg);
}

pub fn success(msg: &str) {
    stdout_line(style("✓").green(), msg);
}

pub fn info(msg: &str) {
    stdout_line(style("ℹ").blue(), msg);
}

pub fn warning(msg: &str) {
    stderr_line(style("⚠").yellow(), msg);
}

pub fn error(msg: &str) {
    stderr_line(style("✗").red(), msg);
}

/// Indented `key: value` line
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Steady-ticking spinner; callers clear it when done
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
