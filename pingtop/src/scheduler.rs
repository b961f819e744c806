//! Auto-ping timer: Idle or Running, plus the in-flight guard.
//!
//! The scheduler is driven by the event loop with explicit `Instant`s and never
//! performs I/O itself. [`Scheduler::poll`] hands out at most one probe at a
//! time; the console reports completion through [`Scheduler::finish`].

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Longest accepted auto-ping interval: one year.
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("enter a URL first")]
    MissingUrl,
    #[error("invalid frequency, enter a number >= 1")]
    InvalidInterval,
}

#[derive(Debug, Clone)]
struct Timer {
    target: String,
    every: Duration,
    next_due: Instant,
}

/// What a call to [`Scheduler::poll`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// No timer armed.
    Idle,
    NotDue,
    /// The timer fired while a probe was still outstanding; dropped.
    Skipped,
    /// Probe this URL now; the scheduler is in flight until `finish`.
    Fire(String),
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timer: Option<Timer>,
    in_flight: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer from user input. Any previous timer is replaced; the
    /// first tick happens one full interval after `now`.
    pub fn start(&mut self, url: &str, interval: &str, now: Instant) -> Result<u64, ScheduleError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ScheduleError::MissingUrl);
        }
        let secs = interval
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| (1..=MAX_INTERVAL_SECS).contains(s))
            .ok_or(ScheduleError::InvalidInterval)?;
        self.arm(url, secs, now)?;
        Ok(secs)
    }

    fn arm(&mut self, url: &str, secs: u64, now: Instant) -> Result<(), ScheduleError> {
        let every = Duration::from_secs(secs);
        let next_due = now.checked_add(every).ok_or(ScheduleError::InvalidInterval)?;
        if let Some(old) = self.timer.take() {
            debug!(target_url = %old.target, "replacing auto-ping timer");
        }
        self.timer = Some(Timer {
            target: url.to_string(),
            every,
            next_due,
        });
        info!(target_url = %url, secs, "auto-ping armed");
        Ok(())
    }

    /// Cancels the timer. Returns false when nothing was running. A probe
    /// already in flight is left alone and still completes.
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(t) => {
                info!(target_url = %t.target, "auto-ping stopped");
                true
            }
            None => false,
        }
    }

    pub fn poll(&mut self, now: Instant) -> Tick {
        let Some(timer) = self.timer.as_mut() else {
            return Tick::Idle;
        };
        if now < timer.next_due {
            return Tick::NotDue;
        }
        // Missed ticks collapse into this one.
        while timer.next_due <= now {
            match timer.next_due.checked_add(timer.every) {
                Some(next) => timer.next_due = next,
                None => {
                    warn!(target_url = %timer.target, "auto-ping clock overflow, timer disarmed");
                    self.timer = None;
                    return Tick::Idle;
                }
            }
        }
        if self.in_flight {
            debug!("tick dropped, probe still in flight");
            return Tick::Skipped;
        }
        self.in_flight = true;
        Tick::Fire(timer.target.clone())
    }

    /// Marks the outstanding auto probe as completed.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn target(&self) -> Option<&str> {
        self.timer.as_ref().map(|t| t.target.as_str())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.timer.as_ref().map(|t| t.every)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.timer.as_ref().map(|t| t.next_due)
    }
}
