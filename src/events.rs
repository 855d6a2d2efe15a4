//! Append-only run log.
//!
//! When `events_file` is configured, every execution and test run is
//! recorded as one JSON object per line (NDJSON).
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `execute`, `execute_failed` or `test_run`
//! - `actor`: `user@HOST`
//! - `blueprint`: blueprint id
//! - `test`: test id, for test runs
//! - `details`: action-specific object (attempts, duration, error, ...)
//!
//! ```no_run
//! use promptforge::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let event = Event::new(EventAction::Execute)
//!     .with_blueprint("bp-summary")
//!     .with_details(json!({"attempts": 2}));
//! append_event("runs.ndjson", &event)?;
//! # Ok::<(), promptforge::error::ForgeError>(())
//! ```

use crate::error::{ForgeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// An execution produced an accepted output.
    Execute,
    /// An execution ended in a transport failure or exhausted its attempts.
    ExecuteFailed,
    /// A test ran to completion and was graded.
    TestRun,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Execute => write!(f, "execute"),
            EventAction::ExecuteFailed => write!(f, "execute_failed"),
            EventAction::TestRun => write!(f, "test_run"),
        }
    }
}

/// One line of the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// Who ran it (e.g., `user@HOST`).
    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create an event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            blueprint: None,
            test: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_blueprint(mut self, blueprint_id: impl Into<String>) -> Self {
        self.blueprint = Some(blueprint_id.into());
        self
    }

    pub fn with_test(mut self, test_id: impl Into<String>) -> Self {
        self.test = Some(test_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForgeError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append `event` as one line to the NDJSON file at `path`.
///
/// The file and its parent directory are created if missing.
pub fn append_event<P: AsRef<Path>>(path: P, event: &Event) -> Result<()> {
    let path = path.as_ref();
    let json_line = event.to_ndjson_line()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ForgeError::UserError(format!(
                "failed to create events directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ForgeError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    tracing::trace!(path = %path.display(), action = %event.action, "event appended");
    Ok(())
}
