//! Allowed "Exp. CPM Range" labels.
//!
//! CPM ranges are labels, not numbers. A table can run unconstrained, with
//! one global dropdown list, or with a list per channel. Matching is
//! case-sensitive: "$6.3 - $6.8" != "$6.3 - $6.80".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "values", rename_all = "snake_case")]
pub enum CpmOptions {
    /// Any label is accepted.
    #[default]
    Unconstrained,
    /// Same list for every channel.
    Global(Vec<String>),
    /// Per-channel lists; channels without an entry are unconstrained.
    PerChannel(BTreeMap<String, Vec<String>>),
}

const DEFAULT_RANGES: [(&str, [&str; 2]); 5] = [
    ("Display", ["$6.3 - $6.8", "$6.5 - $7.0"]),
    ("FEP", ["$8.1 - $8.9", "$8.0 - $8.7"]),
    ("Search", ["$5.0 - $5.5", "$5.2 - $5.8"]),
    ("Social Media", ["$9.3 - $10.0", "$9.1 - $9.8"]),
    ("Video", ["$6.3 - $6.8", "$6.5 - $7.0"]),
];

const DEFAULT_GLOBAL: [&str; 4] = ["$6.3 - $6.8", "$8.1 - $8.9", "$5.0 - $5.5", "$9.3 - $10.0"];

impl CpmOptions {
    /// Recommended and planned range for each of the five stock channels.
    pub fn default_per_channel() -> Self {
        Self::PerChannel(
            DEFAULT_RANGES
                .iter()
                .map(|(channel, ranges)| {
                    (channel.to_string(), ranges.iter().map(|s| s.to_string()).collect())
                })
                .collect(),
        )
    }

    pub fn default_global() -> Self {
        Self::Global(DEFAULT_GLOBAL.iter().map(|s| s.to_string()).collect())
    }

    /// Allowed labels for `channel`, or `None` when the channel is unconstrained.
    pub fn allowed_values(&self, channel: &str) -> Option<&[String]> {
        match self {
            Self::Unconstrained => None,
            Self::Global(values) => Some(values),
            Self::PerChannel(map) => map.get(channel).map(|v| v.as_slice()),
        }
    }

    pub fn allows(&self, channel: &str, value: &str) -> bool {
        match self.allowed_values(channel) {
            Some(values) => values.iter().any(|v| v == value),
            None => true,
        }
    }

    pub fn is_constrained(&self) -> bool {
        !matches!(self, Self::Unconstrained)
    }
}
