//! Spinner shown while a captured command or a network step runs

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a steady spinner with `message`. Hidden when stderr is not a terminal.
pub fn start(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
