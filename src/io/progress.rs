//! Preprocessing progress shown as a single bar

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{LazyLock, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Tiles: [{bar:40.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks `processed/total` while tiles are preprocessed
///
/// Safe to share across preprocessing workers. Counters are atomic and message updates
/// are serialized, so the displayed count never moves backwards.
pub struct ProgressManager {
    bar: ProgressBar,
    processed: AtomicUsize,
    total: AtomicUsize,
    message: Mutex<()>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a visible progress display
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Create a display that tracks counts without drawing
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(PROGRESS_STYLE.clone());
        Self {
            bar,
            processed: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            message: Mutex::new(()),
        }
    }

    /// Reset for a batch of `total` files
    pub fn initialize(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(Self::format_progress(0, total));
    }

    /// Record one finished file; `processed` is false for skipped files
    pub fn record(&self, processed: bool) {
        if processed {
            self.processed.fetch_add(1, Ordering::AcqRel);
        }
        self.bar.inc(1);

        let _guard = self.message.lock().unwrap_or_else(PoisonError::into_inner);
        let done = self.processed.load(Ordering::Acquire);
        self.bar
            .set_message(Self::format_progress(done, self.total.load(Ordering::Relaxed)));
    }

    /// Files processed so far
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Message currently shown next to the bar
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// `processed/total tiles processed (pct%)`
    pub fn format_progress(processed: usize, total: usize) -> String {
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        format!("{processed}/{total} tiles processed ({percent:.2}%)")
    }
}
