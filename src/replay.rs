//! Replay — feed a recorded sequence of pushes through a dispatcher
//!
//! A replay file is a JSON array of `{"function": ..., "params": {...}}`
//! objects. Pushes are dispatched in file order.

use crate::bag::from_json;
use crate::dispatch::TagDispatcher;
use crate::handler::TagError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded push.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Push {
    pub function: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// A push that was routed but dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position in the replay file
    pub index: usize,
    pub handler: String,
    pub error: TagError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplaySummary {
    pub total: usize,
    /// Pushes some handler received, accepted or not
    pub routed: usize,
    /// Function names no handler registered
    pub unrouted: Vec<String>,
    pub rejected: Vec<Rejection>,
}

impl ReplaySummary {
    pub fn accepted(&self) -> usize {
        self.routed - self.rejected.len()
    }
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} pushes: {} routed ({} accepted, {} rejected), {} unrouted",
            self.total,
            self.routed,
            self.accepted(),
            self.rejected.len(),
            self.unrouted.len()
        )?;
        for rejection in &self.rejected {
            writeln!(
                f,
                "  #{} {}: {}",
                rejection.index, rejection.handler, rejection.error
            )?;
        }
        for function in &self.unrouted {
            writeln!(f, "  unrouted: {}", function)?;
        }
        Ok(())
    }
}

pub fn parse_pushes(text: &str) -> Result<Vec<Push>, ReplayError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_pushes(path: &Path) -> Result<Vec<Push>, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pushes(&text)
}

/// Dispatch every push in order and tally the outcomes.
pub fn replay(dispatcher: &mut TagDispatcher, pushes: &[Push]) -> ReplaySummary {
    let mut summary = ReplaySummary {
        total: pushes.len(),
        ..ReplaySummary::default()
    };

    for (index, push) in pushes.iter().enumerate() {
        let result = dispatcher.dispatch(&push.function, from_json(&push.params));
        if !result.is_routed() {
            summary.unrouted.push(push.function.clone());
            continue;
        }
        summary.routed += 1;
        for (handler, error) in result.errors {
            summary.rejected.push(Rejection {
                index,
                handler,
                error,
            });
        }
    }

    summary
}
