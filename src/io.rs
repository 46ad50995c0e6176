//! Status output.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle =
        ProgressStyle::default_bar().template("Progress: {bar:40}  {percent}% | ETA: {eta}");
}

/// How much non-critical output to produce.
#[derive(Clone, Debug)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Creates a verbosity level showing a progress bar with the default style.
    pub fn default_progress() -> Self {
        Self::Progress(DEFAULT_PROGRESS_STYLE.clone())
    }

    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Creates a progress bar of the given length, which is hidden unless
    /// progress is to be shown.
    pub fn create_progress_bar(&self, length: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => {
                let bar = ProgressBar::new(length as u64);
                bar.set_style(style.clone());
                bar
            }
            _ => {
                let bar = ProgressBar::new(length as u64);
                bar.set_draw_target(ProgressDrawTarget::hidden());
                bar
            }
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Quiet
    }
}
