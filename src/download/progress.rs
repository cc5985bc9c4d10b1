//! Per-job byte counters and the terminal reporter that renders them.
//!
//! Each job owns its own [`ProgressCounter`]; the transfer is the only writer
//! and one reporter task is the only reader.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;
use tracing::debug;

const UNKNOWN_TOTAL: u64 = u64::MAX;
const REPORT_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug)]
struct CounterState {
    transferred: AtomicU64,
    total: AtomicU64,
}

/// Bytes transferred so far and the expected total for one transfer.
///
/// Cloning shares the same counter.
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    state: Arc<CounterState>,
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCounter {
    /// Creates a counter at zero bytes with an unknown total.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(CounterState {
                transferred: AtomicU64::new(0),
                total: AtomicU64::new(UNKNOWN_TOTAL),
            }),
        }
    }

    /// Records the expected total; `None` marks it unknown.
    pub fn set_total(&self, total: Option<u64>) {
        self.state
            .total
            .store(total.unwrap_or(UNKNOWN_TOTAL), Ordering::Release);
    }

    /// Adds `bytes` to the transferred count.
    pub fn add(&self, bytes: u64) {
        self.state.transferred.fetch_add(bytes, Ordering::AcqRel);
    }

    /// Bytes transferred so far.
    #[must_use]
    pub fn transferred(&self) -> u64 {
        self.state.transferred.load(Ordering::Acquire)
    }

    /// Expected total, if known.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        match self.state.total.load(Ordering::Acquire) {
            UNKNOWN_TOTAL => None,
            total => Some(total),
        }
    }

    /// `round(transferred * 100 / total)`, capped at 100; `None` while the
    /// total is unknown. A zero-byte total counts as complete.
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        let total = self.total()?;
        if total == 0 {
            return Some(100);
        }
        let transferred = u128::from(self.transferred());
        let total = u128::from(total);
        let rounded = (transferred * 100 + total / 2) / total;
        Some(u8::try_from(rounded.min(100)).unwrap_or(100))
    }
}

/// Handle to a running reporter task.
#[derive(Debug)]
pub struct ProgressReporter {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

impl ProgressReporter {
    /// Signals the reporter to stop and waits for it to clear its bar.
    pub async fn finish(self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(error) = self.handle.await {
            debug!(error = %error, "progress reporter task ended abnormally");
        }
    }
}

/// Spawns a reporter that renders `counter` as a bar inside `multi`.
///
/// The reporter redraws until the counter reaches 100% or
/// [`ProgressReporter::finish`] is called. With an unknown total it shows a
/// spinner with the byte count instead.
#[must_use]
pub fn spawn_progress_reporter(
    multi: &MultiProgress,
    label: impl Into<String>,
    counter: ProgressCounter,
) -> ProgressReporter {
    let stop = Arc::new(AtomicBool::new(false));
    let bar = multi.add(ProgressBar::no_length());
    bar.set_message(label.into());
    let handle = tokio::spawn(run_reporter(bar, counter, Arc::clone(&stop)));
    ProgressReporter { handle, stop }
}

async fn run_reporter(bar: ProgressBar, counter: ProgressCounter, stop: Arc<AtomicBool>) {
    let mut has_length = false;
    bar.set_style(spinner_style());
    bar.enable_steady_tick(Duration::from_millis(100));

    loop {
        if let (Some(total), false) = (counter.total(), has_length) {
            bar.set_length(total);
            bar.set_style(bar_style());
            has_length = true;
        }
        bar.set_position(counter.transferred());

        if counter.percent() == Some(100) || stop.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(REPORT_INTERVAL).await;
    }

    bar.set_position(counter.transferred());
    bar.finish_and_clear();
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:30!} [{bar:30}] {percent:>3}% {bytes}/{total_bytes}")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg:30!} {bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
