//! Retrieval configuration.
//!
//! Every knob has a default; a JSON document only needs the fields it
//! overrides:
//!
//! ```json
//! { "top_k": 5, "enable_fallback": false }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RetrievalError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Ranked paths returned per query.
    pub top_k: usize,
    /// Frames pushed per depth per anchor during search.
    pub max_results_per_hop: usize,
    /// Core entities searched from.
    pub max_anchors: usize,
    /// Nodes examined by the substring tier before giving up.
    pub substring_scan_limit: usize,
    /// Keys examined by the normalized-name prefix scan.
    pub index_prefix_scan_limit: usize,
    /// Token resolutions memoized (0 disables the cache).
    pub resolution_cache_capacity: usize,
    /// Node degrees memoized for hub detection (0 disables the cache).
    pub degree_cache_capacity: usize,
    pub enable_fallback: bool,
    /// Replaces the hop limit chosen by intent classification.
    pub hop_limit_override: Option<usize>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_results_per_hop: 100,
            max_anchors: 3,
            substring_scan_limit: 200_000,
            index_prefix_scan_limit: 64,
            resolution_cache_capacity: 4096,
            degree_cache_capacity: 16_384,
            enable_fallback: true,
            hop_limit_override: None,
        }
    }
}

impl RetrievalConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject settings that would make every query return nothing.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidConfig {
                field: "top_k",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_results_per_hop == 0 {
            return Err(RetrievalError::InvalidConfig {
                field: "max_results_per_hop",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_anchors == 0 {
            return Err(RetrievalError::InvalidConfig {
                field: "max_anchors",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn top_k(mut self, n: usize) -> Self {
        self.top_k = n;
        self
    }

    pub fn max_results_per_hop(mut self, n: usize) -> Self {
        self.max_results_per_hop = n;
        self
    }

    pub fn max_anchors(mut self, n: usize) -> Self {
        self.max_anchors = n;
        self
    }

    pub fn substring_scan_limit(mut self, n: usize) -> Self {
        self.substring_scan_limit = n;
        self
    }

    pub fn enable_fallback(mut self, enable: bool) -> Self {
        self.enable_fallback = enable;
        self
    }

    pub fn hop_limit_override(mut self, hops: Option<usize>) -> Self {
        self.hop_limit_override = hops;
        self
    }
}
