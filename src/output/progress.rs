//! Progress bar utilities.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::export::ProgressReporter;

/// Resolution of the export bar; fractions are scaled to this length.
const BAR_LENGTH: u64 = 1000;

/// Create a progress bar for a whole export.
pub fn create_export_bar() -> ProgressBar {
    let bar = ProgressBar::new(BAR_LENGTH);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar
}

/// Drives an indicatif bar from export progress updates.
///
/// Per-chunk updates only move the bar; the log gets one line per phase.
pub struct ProgressBarReporter {
    bar: ProgressBar,
    last_phase: Mutex<String>,
}

impl ProgressBarReporter {
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            last_phase: Mutex::new(String::new()),
        }
    }

    /// A bar that draws nothing, for `--quiet`.
    pub fn hidden() -> Self {
        Self::new(ProgressBar::hidden())
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Record the phase of `status`, returning true when it differs from
    /// the previous one.
    fn enter_phase(&self, status: &str) -> bool {
        let phase = phase_label(status);
        let mut last = match self.last_phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last == phase {
            return false;
        }
        *last = phase.to_string();
        true
    }
}

/// Status text without its trailing counter, e.g. `Downloading database...`
/// for `Downloading database... (42%)`.
fn phase_label(status: &str) -> &str {
    status.split(" (").next().unwrap_or(status).trim_end()
}

impl ProgressReporter for ProgressBarReporter {
    fn report(&self, fraction: f64, status: &str) {
        let position = (fraction.clamp(0.0, 1.0) * BAR_LENGTH as f64).round() as u64;
        self.bar.set_position(position);
        self.bar.set_message(status.to_string());
        if self.enter_phase(status) {
            tracing::debug!("{:>5.1}% {}", fraction * 100.0, status);
        }
    }
}
