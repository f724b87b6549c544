//! Mirror selection and marker tie-break modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a failover host is chosen from a chapter's mirror list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MirrorStrategy {
    /// Pick a mirror uniformly at random (default).
    #[default]
    Random,
    /// Cycle through mirrors in manifest order.
    RoundRobin,
}

impl fmt::Display for MirrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorStrategy::Random => write!(f, "random"),
            MirrorStrategy::RoundRobin => write!(f, "round-robin"),
        }
    }
}

impl FromStr for MirrorStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(MirrorStrategy::Random),
            "round-robin" | "roundrobin" => Ok(MirrorStrategy::RoundRobin),
            _ => Err(format!("Unknown mirror strategy: {}", s)),
        }
    }
}

/// Which line wins when a chapter page carries several lines with the same marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerTieBreak {
    /// Use the first matching line and log a warning (default).
    #[default]
    First,
    /// Use the last matching line and log a warning.
    Last,
    /// Treat more than one match as a decode error.
    Reject,
}

impl fmt::Display for MarkerTieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerTieBreak::First => write!(f, "first"),
            MarkerTieBreak::Last => write!(f, "last"),
            MarkerTieBreak::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for MarkerTieBreak {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(MarkerTieBreak::First),
            "last" => Ok(MarkerTieBreak::Last),
            "reject" => Ok(MarkerTieBreak::Reject),
            _ => Err(format!("Unknown tie-break mode: {}", s)),
        }
    }
}
