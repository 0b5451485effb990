use serde::{Deserialize, Serialize};

/// Last known health of an operation as reported by the status feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Unknown,
    Green,
    Yellow,
    Red,
}

impl HealthStatus {
    /// Numeric level: -1 unknown, 0 green, 1 yellow, 2 red.
    pub fn level(self) -> i8 {
        match self {
            HealthStatus::Unknown => -1,
            HealthStatus::Green => 0,
            HealthStatus::Yellow => 1,
            HealthStatus::Red => 2,
        }
    }

    /// Contribution to the aggregate health score.
    pub fn weight(self) -> f64 {
        match self {
            HealthStatus::Unknown | HealthStatus::Green => 0.0,
            HealthStatus::Yellow => 0.5,
            HealthStatus::Red => 1.0,
        }
    }

    /// Feed values outside green/yellow/red count as green.
    pub fn from_feed(s: &str) -> Self {
        match s {
            "yellow" => HealthStatus::Yellow,
            "red" => HealthStatus::Red,
            _ => HealthStatus::Green,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Green => "green",
            HealthStatus::Yellow => "yellow",
            HealthStatus::Red => "red",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
