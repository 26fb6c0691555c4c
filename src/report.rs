//! JSON ranking reports for snapshots.
//!
//! A [`RankingReport`] labels a snapshot's ranking with the strategy that
//! produced it, ready to be compared across runs or shipped to whatever reads
//! JSON.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! presenze = { version = "0.3", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use presenze::aggregator::{Aggregator, Strategy};
//! use presenze::report::RankingReport;
//!
//! let aggregator = Strategy::Locked.build();
//! aggregator.increment("Cairo");
//!
//! let report = RankingReport::new(aggregator.name(), &aggregator.snapshot());
//! let json = report.to_json().unwrap();
//! assert!(json.contains("Cairo"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::counts::CheckInCounts;

/// Error type for report serialization.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error serializing the report to JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// One city's position in a ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingEntry {
    /// The city name.
    pub city: String,
    /// Check-ins recorded for the city.
    pub check_ins: u64,
}

/// A strategy-labeled ranking derived from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingReport {
    /// Name of the strategy the snapshot was taken from.
    pub strategy: String,
    /// Cities by descending check-in count, ties by name.
    pub ranking: Vec<RankingEntry>,
    /// Sum of all check-ins in the snapshot.
    pub total: u64,
}

impl RankingReport {
    /// Builds a report from a snapshot.
    pub fn new(strategy: impl Into<String>, counts: &CheckInCounts) -> Self {
        Self {
            strategy: strategy.into(),
            ranking: counts
                .ranking()
                .into_iter()
                .map(|(city, check_ins)| RankingEntry {
                    city: city.to_owned(),
                    check_ins,
                })
                .collect(),
            total: counts.total(),
        }
    }

    /// Serializes the report to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
