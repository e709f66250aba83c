//! Cosmetic progress animation shown while a request is in flight.
//!
//! The bar does not track real transfer progress: a ticker thread moves it
//! forward by a fixed step until it reaches 95%, and the handler snaps it to
//! 100% once the request finishes. The ticker is stopped when the
//! [`Animation`] is finished, abandoned or dropped, whichever comes first.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const STEP: u64 = 5;
const CEILING: u64 = 95;
const TOTAL: u64 = 100;

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {bar:30.cyan} | {percent:>3}% | {msg}")
        .expect("Invalid progress bar template")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✓")
        .progress_chars("■■□")
}

/// A running progress animation.
pub struct Animation {
    bar: ProgressBar,
    stop: Option<Sender<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl Animation {
    /// Start animating with `status` as the message, stepping every `interval`.
    pub fn start(status: &str, interval: Duration) -> Self {
        Self::with_bar(ProgressBar::new(TOTAL), status, interval)
    }

    /// Same as [`Animation::start`] but never draws anything.
    pub fn hidden(interval: Duration) -> Self {
        Self::with_bar(ProgressBar::hidden(), "", interval)
    }

    fn with_bar(bar: ProgressBar, status: &str, interval: Duration) -> Self {
        bar.set_style(style());
        bar.set_length(TOTAL);
        bar.set_message(status.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        let (stop, ticks) = mpsc::channel::<()>();
        let ticking = bar.clone();
        let ticker = thread::spawn(move || loop {
            match ticks.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if ticking.position() < CEILING {
                        ticking.inc(STEP);
                    }
                }
                _ => break,
            }
        });

        Self {
            bar,
            stop: Some(stop),
            ticker: Some(ticker),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn halt(&mut self) {
        // dropping the sender wakes the ticker immediately
        self.stop.take();
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.join();
        }
    }

    /// Stop the ticker and show the bar as complete.
    pub fn finish(mut self) {
        self.halt();
        self.bar.set_position(TOTAL);
        self.bar.finish_with_message("Complete");
    }

    /// Stop the ticker and leave the bar where it is.
    pub fn abandon(mut self) {
        self.halt();
        self.bar.abandon();
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.halt();
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
