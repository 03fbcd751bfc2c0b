//! Progress reporting for window loops.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}";

/// A progress bar over `len` windows, hidden unless `enabled`.
pub(crate) fn window_progress(enabled: bool, len: usize, message: &'static str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
        bar.set_style(style.progress_chars("█▓░"));
    }
    bar.set_message(message);
    bar
}
