//! Progress display while the registry is cloned or fetched

use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown during network operations
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner with `message`; hidden when stderr is not a terminal
    pub fn start(message: impl Into<String>) -> Self {
        let bar = if Term::stderr().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Stop and clear the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
