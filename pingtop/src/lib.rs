//! pingtop: terminal console for a URL-availability backend.
//!
//! Submit a URL, let the backend probe it, and watch a newest-first log of
//! outcomes. Auto-ping repeats the probe on a timer without ever overlapping.

pub mod api;
pub mod app;
pub mod console;
pub mod error;
pub mod input;
pub mod logging;
pub mod profiles;
pub mod results;
pub mod scheduler;
pub mod types;
pub mod ui;

pub use api::{ApiClient, ProbeApi, ReqwestTransport, Transport};
pub use console::Console;
pub use error::ApiError;
pub use results::ResultLog;
pub use scheduler::Scheduler;
pub use types::{ProbeResult, ProbeState, SLOW_THRESHOLD_MS};
