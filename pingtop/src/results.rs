//! Newest-first log of probe outcomes plus the status banner.
//!
//! The log is the source of truth; [`ResultLog::lines`] is the projection the
//! UI draws from.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::types::{ProbeResult, ProbeState};

pub const PLACEHOLDER_TEXT: &str = "No results yet.";
pub const MISSING: &str = "—";
pub const DEFAULT_MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Ok,
    Err,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: StatusKind,
}

/// Display-ready fields of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub time: String,
    pub url: String,
    pub state: ProbeState,
    pub latency: String,
    pub code: String,
    /// Explanatory sub-line, only for offline entries with a message.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    Placeholder,
    Entry(EntryView),
}

#[derive(Debug)]
pub struct ResultLog {
    entries: VecDeque<ProbeResult>,
    max_entries: usize,
    banner: Option<Banner>,
}

impl ResultLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            banner: None,
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Inserts at the front; the oldest entry falls off past `max_entries`.
    pub fn append(&mut self, result: ProbeResult) {
        self.entries.push_front(result);
        if self.entries.len() > self.max_entries {
            self.entries.pop_back();
        }
    }

    /// Replaces the log with `results`, kept in the order received.
    pub fn load_all(&mut self, results: Vec<ProbeResult>) {
        self.reset();
        self.entries
            .extend(results.into_iter().take(self.max_entries));
    }

    /// Empty `text` clears the banner.
    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        let text = text.into();
        self.banner = if text.is_empty() {
            None
        } else {
            Some(Banner { text, kind })
        };
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProbeResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        if self.entries.is_empty() {
            return vec![LogLine::Placeholder];
        }
        self.entries
            .iter()
            .map(|r| LogLine::Entry(entry_view(r)))
            .collect()
    }
}

impl Default for ResultLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

pub fn entry_view(r: &ProbeResult) -> EntryView {
    EntryView {
        time: format_time(r.checked_at.as_deref()),
        url: r.url.clone(),
        state: r.state(),
        latency: r
            .latency_ms
            .map(|ms| format!("{ms:.0} ms"))
            .unwrap_or_else(|| format!("{MISSING} ms")),
        code: r
            .http_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        detail: r.error_detail().map(str::to_string),
    }
}

/// Local `HH:MM:SS`, or a dash when the timestamp is absent or unparseable.
pub fn format_time(ts: Option<&str>) -> String {
    ts.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|d| d.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// One-line plain text rendering, used by the non-interactive commands.
pub fn plain_line(line: &LogLine) -> String {
    match line {
        LogLine::Placeholder => PLACEHOLDER_TEXT.to_string(),
        LogLine::Entry(e) => {
            let mut s = format!(
                "{}  {:<7}  {:>9}  {:>4}  {}",
                e.time,
                e.state.label(),
                e.latency,
                e.code,
                e.url
            );
            if let Some(d) = &e.detail {
                s.push_str("\n          ");
                s.push_str(d);
            }
            s
        }
    }
}
