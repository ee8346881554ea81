//! Spinner helpers for long-running, indeterminate operations.
//!
//! BWC only waits on two kinds of slow work: fetching the registry over HTTP
//! and querying external CLIs during verification. Both are indeterminate, so
//! only a spinner is offered. Spinners are hidden by `--no-progress` or when
//! the `BWC_NO_PROGRESS` environment variable is set.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A spinner with consistent styling that renders to stderr.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner, or a hidden bar when `hidden` is set or progress
    /// output is disabled through the environment.
    ///
    /// The spinner uses Braille patterns and ticks every 100ms.
    pub fn new_spinner(hidden: bool) -> Self {
        let bar = if hidden || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Replaces the message displayed next to the spinner.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Stops the spinner and leaves a final message on screen.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Stops the spinner and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether this spinner draws anything.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
}

/// Creates a spinner already showing `msg`.
pub fn spinner_with_message(msg: impl Into<String>, hidden: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner(hidden);
    spinner.set_message(msg);
    spinner
}
