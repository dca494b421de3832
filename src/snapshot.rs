//! Point-in-time distributed-state reports
//!
//! A `DistSnapshot` freezes the facade's three answers plus the host name
//! into a serializable value: the "rank 3 of 8 on gpu-node-7" line every
//! training log starts with, and the per-process record a job can aggregate
//! after the fact. A snapshot is a copy, never a cache; the live context
//! keeps re-evaluating its runtime.

use crate::DistContext;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time report of a context's answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistSnapshot {
    /// Whether a distributed runtime was active at capture time
    pub enabled: bool,

    /// Rank at capture time (0 when not distributed)
    pub rank: usize,

    /// World size at capture time (1 when not distributed)
    pub world_size: usize,

    /// Host name, or "unknown" when the OS will not say
    pub host: String,
}

impl DistSnapshot {
    /// Capture the current answers of the given context
    pub fn capture(ctx: &DistContext) -> Self {
        Self {
            enabled: ctx.is_enabled(),
            rank: ctx.rank(),
            world_size: ctx.world_size(),
            host: host_name(),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).context("Failed to serialize snapshot")
    }
}

impl fmt::Display for DistSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "rank {} of {} on {}", self.rank, self.world_size, self.host)
        } else {
            write!(f, "standalone on {}", self.host)
        }
    }
}

/// Host name for node identification, "unknown" when unavailable
fn host_name() -> String {
    if let Ok(name) = hostname::get() {
        if let Ok(name) = name.into_string() {
            return name;
        }
    }

    "unknown".to_string()
}
