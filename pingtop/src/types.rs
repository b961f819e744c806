//! Types that mirror the backend's JSON schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Latency at or above which an available target is shown as slow.
/// Must stay in line with the backend's own threshold.
pub const SLOW_THRESHOLD_MS: f64 = 800.0;

/// Page size used when loading recent results.
pub const DEFAULT_LIMIT: usize = 50;

/// One probe outcome as reported by the backend (`statut` object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    #[serde(rename = "est_disponible")]
    pub is_available: bool,
    #[serde(rename = "code_http", default)]
    pub http_code: Option<i64>,
    #[serde(rename = "message_erreur", default)]
    pub error_message: Option<String>,
    #[serde(rename = "latence_ms", default)]
    pub latency_ms: Option<f64>,
    #[serde(rename = "verifie_a", default)]
    pub checked_at: Option<String>,
}

impl ProbeResult {
    pub fn state(&self) -> ProbeState {
        ProbeState::classify(self.is_available, self.latency_ms)
    }

    /// Error text worth showing under the entry: only for unavailable targets
    /// and only when the backend sent a non-empty message.
    pub fn error_detail(&self) -> Option<&str> {
        if self.is_available {
            return None;
        }
        self.error_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Online,
    Slow,
    Offline,
}

impl ProbeState {
    pub fn classify(is_available: bool, latency_ms: Option<f64>) -> Self {
        if !is_available {
            return ProbeState::Offline;
        }
        match latency_ms {
            Some(ms) if ms >= SLOW_THRESHOLD_MS => ProbeState::Slow,
            _ => ProbeState::Online,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbeState::Online => "ONLINE",
            ProbeState::Slow => "SLOW",
            ProbeState::Offline => "OFFLINE",
        }
    }
}

/// Request body for a probe submission.
#[derive(Debug, Serialize)]
pub(crate) struct CheckRequest<'a> {
    pub url: &'a str,
}

/// The two shapes `GET /api/resultats` may answer with. Rows stay raw so one
/// bad row does not sink the whole page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecentReply {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        resultats: Option<Vec<Value>>,
    },
}

impl RecentReply {
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            RecentReply::Bare(v) => v,
            RecentReply::Wrapped { resultats } => resultats.unwrap_or_default(),
        }
    }
}

/// Error body of a non-2xx response; both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorReply {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
