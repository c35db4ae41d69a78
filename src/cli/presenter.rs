//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::{ComposerSnapshot, PlaybackSource, Severity, Status};
use crate::domain::recording::Duration;
use crate::domain::timeline::{EntryKind, TimelineEntry};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start the live recording indicator
    pub fn start_recording_timer(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("●○ ")
            .template("{spinner:.red} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(Self::format_elapsed(Duration::ZERO));
        spinner.enable_steady_tick(std::time::Duration::from_millis(500));
        self.spinner = Some(spinner);
    }

    /// Refresh the recording indicator with the elapsed time
    pub fn update_recording_timer(&self, elapsed: Duration) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(Self::format_elapsed(elapsed));
        }
    }

    /// Remove the recording indicator
    pub fn stop_recording_timer(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn is_timer_running(&self) -> bool {
        self.spinner.is_some()
    }

    /// Label shown next to the recording indicator
    pub fn format_elapsed(elapsed: Duration) -> String {
        format!("Recording {}", elapsed.clock())
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.println_err(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.println_err(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.println_err(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.println_err(format!("{} {}", "✗".red(), message));
    }

    /// Announce a status from the composer
    pub fn status(&self, status: &Status) {
        let message = status.message();
        match status.severity() {
            Severity::Info => self.info(&message),
            Severity::Success => self.success(&message),
            Severity::Warning => self.warn(&message),
            Severity::Error => self.error(&message),
        }
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Show the input prompt
    pub fn prompt(&self) {
        print!("{} ", ">".bold());
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the timeline, newest first
    pub fn timeline<'a>(&self, entries: impl ExactSizeIterator<Item = &'a TimelineEntry>) {
        if entries.len() == 0 {
            self.output(&"No entries yet".dimmed().to_string());
            return;
        }
        for entry in entries {
            self.output(&Self::format_entry(entry));
        }
    }

    /// One line per entry: id, time, module, author, then content
    pub fn format_entry(entry: &TimelineEntry) -> String {
        let id = entry
            .id()
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "#?".to_string());

        let body = match entry.kind() {
            EntryKind::Note => entry.text().to_string(),
            EntryKind::Audio => {
                let detail = entry
                    .artifact()
                    .map(|a| format!(" ({}, {})", a.duration().clock(), a.human_readable_size()))
                    .unwrap_or_default();
                format!("♪ {}{}", entry.text(), detail)
            }
        };

        format!(
            "{} {} [{}] {}: {}",
            id.bold(),
            entry.display_time().dimmed(),
            entry.module().as_str().cyan(),
            entry.author().bold(),
            body
        )
    }

    /// Print the composer's observable state
    pub fn snapshot(&self, snapshot: &ComposerSnapshot) {
        let capture = if snapshot.capture_available {
            "available".green()
        } else {
            "unavailable".red()
        };
        let playing = match snapshot.playing {
            None => "no".to_string(),
            Some(PlaybackSource::Draft) => "draft audio".to_string(),
            Some(PlaybackSource::Entry(id)) => format!("entry #{}", id),
        };

        self.key_value("capture", &capture.to_string());
        self.key_value("recorder", snapshot.recorder_state.as_str());
        self.key_value("elapsed", &snapshot.elapsed.clock());
        self.key_value("playing", &playing);
        self.key_value(
            "text",
            &format!("{}/{} chars", snapshot.char_count, snapshot.max_chars),
        );
        self.key_value("audio attached", &snapshot.has_artifact.to_string());
        self.key_value("can send", &snapshot.can_commit.to_string());
        self.key_value("entries", &snapshot.entry_count.to_string());
    }

    fn println_err(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
