//! Terminal output and prompts shared by the commands
//!
//! Status lines go to stdout, except failures which go to stderr.

use colored::{ColoredString, Colorize};
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const RULE_WIDTH: usize = 60;
const SPINNER_TICK: Duration = Duration::from_millis(100);

fn status(mark: ColoredString, message: &str) {
    println!("{} {}", mark.bold(), message);
}

pub fn success(message: &str) {
    status("✓".green(), message);
}

/// Failure line on stderr
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn info(message: &str) {
    status("ℹ".blue(), message);
}

pub fn warning(message: &str) {
    status("⚠".yellow(), message);
}

/// Underlined title preceded by a blank line
pub fn header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Indented `label: value` line
pub fn key_value(label: &str, value: &str) {
    println!("  {}: {}", label.cyan(), value);
}

/// Spinner shown while the wallet is busy.
///
/// It stays blank until [`start_spinner`]; prompts drawn in between are not
/// disturbed.
pub fn idle_spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let spinner = ProgressBar::new_spinner().with_style(style);
    spinner.set_message(message.to_string());
    spinner
}

pub fn start_spinner(spinner: &ProgressBar) {
    spinner.enable_steady_tick(SPINNER_TICK);
}

/// Yes/no question
pub fn confirm(question: &str, default: bool) -> anyhow::Result<bool> {
    let answer = Confirm::new()
        .with_prompt(question)
        .default(default)
        .interact()?;
    Ok(answer)
}

/// Free-text field pre-filled with `current`; an empty answer is accepted
pub fn input_allow_empty(label: &str, current: &str) -> anyhow::Result<String> {
    let answer = Input::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

/// Render `data` as a QR code drawn with block characters
pub fn qr_code(data: &str) -> anyhow::Result<()> {
    let code = qrcode::QrCode::new(data)?;
    let rendered = code
        .render::<char>()
        .quiet_zone(false)
        .module_dimensions(2, 1)
        .build();
    println!("\n{}\n", rendered);
    Ok(())
}

pub fn separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

/// Pretty-printed JSON; values that fail to render are skipped
pub fn json(value: &serde_json::Value) {
    if let Ok(text) = serde_json::to_string_pretty(value) {
        println!("{}", text);
    }
}
