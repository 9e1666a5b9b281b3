//! Terminal output for the CLI.
//!
//! Human-readable lines are suppressed in `--json` mode, where each command
//! prints one JSON document instead.

use std::fmt::Display;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn line(&self, stream: Stream, text: impl Display) {
        if self.json {
            return;
        }
        match stream {
            Stream::Stdout => println!("{}", text),
            Stream::Stderr => eprintln!("{}", text),
        }
    }

    pub fn info(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("{} {}", style("ℹ").blue(), msg));
    }

    pub fn success(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("{} {}", style("✓").green(), msg));
    }

    pub fn warn(&self, msg: &str) {
        self.line(Stream::Stderr, format_args!("{} {}", style("⚠").yellow(), msg));
    }

    /// Errors are reported in JSON mode too, as `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(Stream::Stderr, style(format!("→ {}", msg)).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        self.line(Stream::Stdout, format_args!("\n{}", style(msg).bold().underlined()));
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.line(Stream::Stdout, format_args!("  {}: {}", style(key).dim(), value));
    }

    /// Left-aligned columns, padded to `widths`.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        let row = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:<width$}", col, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        self.line(Stream::Stdout, format_args!("  {}", row.trim_end()));
    }

    /// One streamed chunk with its arrival time. The markup is shown in
    /// verbose mode only.
    pub fn chunk(&self, index: usize, elapsed: Duration, html: &str) {
        self.line(
            Stream::Stdout,
            format_args!(
                "{} chunk {} {}",
                style(format!("[{:>6}ms]", elapsed.as_millis())).cyan(),
                index,
                style(format!("({})", format_bytes(html.len() as u64))).dim()
            ),
        );
        if self.verbose {
            self.line(Stream::Stdout, html);
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Human-readable byte size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    match bytes {
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
