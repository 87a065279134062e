//! Port labels of a crossing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, KnotError};

/// Local attachment position of an edge-end at a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Port {
    /// Top-left (`tl`).
    #[serde(rename = "tl")]
    TopLeft,
    /// Top-right (`tr`).
    #[serde(rename = "tr")]
    TopRight,
    /// Bottom-left (`bl`).
    #[serde(rename = "bl")]
    BottomLeft,
    /// Bottom-right (`br`).
    #[serde(rename = "br")]
    BottomRight,
}

impl Port {
    /// The four ports of a crossing in canonical order.
    pub const ALL: [Port; 4] = [
        Port::TopLeft,
        Port::TopRight,
        Port::BottomLeft,
        Port::BottomRight,
    ];

    /// Returns the short label used in serialized payloads.
    pub const fn label(self) -> &'static str {
        match self {
            Port::TopLeft => "tl",
            Port::TopRight => "tr",
            Port::BottomLeft => "bl",
            Port::BottomRight => "br",
        }
    }

    /// Returns the position of the port within [`Port::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Port::TopLeft => 0,
            Port::TopRight => 1,
            Port::BottomLeft => 2,
            Port::BottomRight => 3,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Port {
    type Err = KnotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tl" => Ok(Port::TopLeft),
            "tr" => Ok(Port::TopRight),
            "bl" => Ok(Port::BottomLeft),
            "br" => Ok(Port::BottomRight),
            other => Err(KnotError::Serde(
                ErrorInfo::new("unknown-port", "port label must be one of tl, tr, bl, br")
                    .with_context("label", other),
            )),
        }
    }
}

/// Returns `true` when `ports` uses each of the four labels exactly once.
pub fn is_port_permutation(ports: &[Port]) -> bool {
    if ports.len() != Port::ALL.len() {
        return false;
    }
    let mut seen = [false; 4];
    for port in ports {
        if std::mem::replace(&mut seen[port.index()], true) {
            return false;
        }
    }
    true
}
