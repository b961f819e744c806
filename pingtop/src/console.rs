//! Console engine: wires the API client, the scheduler and the result log.
//!
//! Network calls run as spawned tasks that only send a [`Completion`] back.
//! Every state change happens in [`Console::apply`], called from the one loop
//! that owns the console, so the log and banner never need locking.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::api::ProbeApi;
use crate::error::ApiError;
use crate::results::{ResultLog, StatusKind};
use crate::scheduler::{ScheduleError, Scheduler, Tick};
use crate::types::ProbeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Submitted by the user; not covered by the in-flight guard.
    Manual,
    /// Fired by the auto-ping timer.
    Auto,
}

#[derive(Debug)]
pub enum Completion {
    Probe {
        origin: Origin,
        outcome: Result<ProbeResult, ApiError>,
    },
    Loaded(Result<Vec<ProbeResult>, ApiError>),
    Cleared(Result<(), ApiError>),
    Health(Result<(), ApiError>),
}

/// What applying a batch of completions changed, for the input layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub count: usize,
    pub manual_ok: bool,
}

pub struct Console {
    api: Arc<dyn ProbeApi>,
    log: ResultLog,
    scheduler: Scheduler,
    limit: usize,
    backend_up: Option<bool>,
    pending: usize,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl Console {
    pub fn new(api: Arc<dyn ProbeApi>, limit: usize, max_entries: usize) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            api,
            log: ResultLog::new(max_entries),
            scheduler: Scheduler::new(),
            limit: limit.max(1),
            backend_up: None,
            pending: 0,
            tx,
            rx,
        }
    }

    pub fn log(&self) -> &ResultLog {
        &self.log
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn backend_up(&self) -> Option<bool> {
        self.backend_up
    }

    /// Number of spawned calls whose completion has not been applied yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    // ---------- user commands ----------

    pub fn load_recent(&mut self) {
        let api = Arc::clone(&self.api);
        let limit = self.limit;
        self.spawn(async move { Completion::Loaded(api.fetch_recent(limit).await) });
    }

    pub fn check_health(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Health(api.health().await) });
    }

    /// One-off probe. Runs alongside any auto-ping and never touches the
    /// scheduler state.
    pub fn submit(&mut self, url: &str) {
        self.log.set_status("Checking…", StatusKind::Info);
        self.spawn_probe(url.to_string(), Origin::Manual);
    }

    pub fn start_auto(&mut self, url: &str, interval: &str, now: Instant) {
        match self.scheduler.start(url, interval, now) {
            Ok(secs) => self
                .log
                .set_status(format!("Auto-ping enabled every {secs}s"), StatusKind::Ok),
            Err(e @ ScheduleError::MissingUrl) => self.log.set_status(e.to_string(), StatusKind::Info),
            Err(e @ ScheduleError::InvalidInterval) => self.log.set_status(e.to_string(), StatusKind::Err),
        }
    }

    pub fn stop_auto(&mut self) {
        if self.scheduler.stop() {
            self.log.set_status("Auto-ping stopped", StatusKind::Info);
        }
    }

    /// Deletes stored results server-side; the local log is reset once the
    /// backend confirms.
    pub fn clear(&mut self) {
        self.log.set_status("Clearing results…", StatusKind::Info);
        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Cleared(api.clear_all().await) });
    }

    // ---------- event loop hooks ----------

    /// Fires the auto-ping probe when the timer is due and nothing is in flight.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let tick = self.scheduler.poll(now);
        if let Tick::Fire(url) = &tick {
            self.spawn_probe(url.clone(), Origin::Auto);
        }
        tick
    }

    /// Applies every completion that already arrived, without waiting.
    pub fn drain(&mut self) -> Applied {
        let mut applied = Applied::default();
        while let Ok(c) = self.rx.try_recv() {
            applied.manual_ok |= self.apply(c);
            applied.count += 1;
        }
        applied
    }

    /// Waits for the next completion and applies it. Returns `None` when no
    /// call is outstanding.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        if self.pending == 0 {
            return None;
        }
        let c = self.rx.recv().await?;
        let manual_ok = self.apply(c);
        Some(Applied {
            count: 1,
            manual_ok,
        })
    }

    /// Waits until every outstanding call has been applied.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Applies one completion to the log and banner. Returns true when it was
    /// a successful manual probe.
    pub fn apply(&mut self, c: Completion) -> bool {
        self.pending = self.pending.saturating_sub(1);
        match c {
            Completion::Probe { origin, outcome } => {
                if origin == Origin::Auto {
                    self.scheduler.finish();
                }
                match outcome {
                    Ok(result) => {
                        debug!(url = %result.url, state = ?result.state(), ?origin, "probe done");
                        self.log.append(result);
                        if origin == Origin::Manual {
                            self.log.set_status("Ping done.", StatusKind::Ok);
                            return true;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, ?origin, "probe failed");
                        self.log.set_status(e.to_string(), StatusKind::Err);
                    }
                }
            }
            Completion::Loaded(Ok(results)) => {
                let n = results.len();
                self.log.load_all(results);
                self.log.set_status(format!("{n} result(s) loaded"), StatusKind::Info);
            }
            Completion::Loaded(Err(e)) => {
                self.log
                    .set_status(format!("Could not load results: {e}"), StatusKind::Err);
            }
            Completion::Cleared(Ok(())) => {
                self.log.reset();
                self.log.set_status("Console cleared.", StatusKind::Info);
            }
            Completion::Cleared(Err(e)) => {
                self.log
                    .set_status(format!("Could not clear results: {e}"), StatusKind::Err);
            }
            Completion::Health(res) => {
                if let Err(e) = &res {
                    debug!(error = %e, "health check failed");
                }
                self.backend_up = Some(res.is_ok());
            }
        }
        false
    }

    fn spawn_probe(&mut self, url: String, origin: Origin) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let outcome = api.submit_check(&url).await;
            Completion::Probe { origin, outcome }
        });
    }

    fn spawn<F>(&mut self, fut: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away with the console itself.
            let _ = tx.send(fut.await);
        });
    }
}
