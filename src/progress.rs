//! Progress reporting of downloads

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// CLI progress report of ongoing downloads
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a report is being displayed. Please use logs
/// for debug messages, and [`println()`](Self::println) for user messages.
#[derive(Clone, Debug)]
pub struct ProgressReport {
    /// Progress bars, drawn on stderr when it is a terminal
    bars: MultiProgress,

    /// Truth that user messages should be discarded
    quiet: bool,
}
//
impl Default for ProgressReport {
    fn default() -> Self {
        Self {
            bars: MultiProgress::new(),
            quiet: false,
        }
    }
}
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that displays nothing, not even user messages
    pub fn hidden() -> Self {
        Self {
            bars: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            quiet: true,
        }
    }

    /// Print a user message
    ///
    /// The message goes above the progress bars if they are displayed, and
    /// directly to stderr otherwise (e.g. when stderr is redirected to a file).
    pub fn println(&self, message: impl AsRef<str>) {
        match self.destination() {
            Destination::Dropped => {}
            Destination::Stderr => eprintln!("{}", message.as_ref()),
            Destination::AboveBars => {
                if let Err(e) = self.bars.println(message) {
                    log::warn!("Failed to print a progress message: {e}");
                }
            }
        }
    }

    /// Progress bar counting downloaded files
    pub fn files(&self, count: usize) -> ProgressBar {
        self.add(
            ProgressBar::new(count as u64).with_prefix("Downloading datasets"),
            "{prefix} {wide_bar} {pos}/{len}",
        )
    }

    /// Progress bar counting downloaded bytes
    ///
    /// Its length starts at zero and grows as response sizes become known.
    pub fn bytes(&self) -> ProgressBar {
        self.add(
            ProgressBar::new(0).with_prefix("Downloaded data"),
            "{prefix} {wide_bar} {decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})",
        )
    }

    /// Style a progress bar and add it to the report
    fn add(&self, bar: ProgressBar, template: &str) -> ProgressBar {
        let style = ProgressStyle::with_template(template)
            .expect("all templates above should be valid indicatif styles");
        self.bars.add(bar.with_style(style))
    }

    /// Where user messages end up
    fn destination(&self) -> Destination {
        if self.quiet {
            Destination::Dropped
        } else if self.bars.is_hidden() {
            Destination::Stderr
        } else {
            Destination::AboveBars
        }
    }
}

/// Where a [`ProgressReport`] sends user messages
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Destination {
    Dropped,
    Stderr,
    AboveBars,
}
