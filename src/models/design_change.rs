//! Design change request levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Urgency level stored in `request_design_change.urgency_level`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UrgencyLevel {
    #[serde(rename = "상")]
    High,
    #[serde(rename = "중")]
    Medium,
    #[serde(rename = "하")]
    Low,
}

impl UrgencyLevel {
    /// All levels in display order.
    pub const ALL: [UrgencyLevel; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "상",
            Self::Medium => "중",
            Self::Low => "하",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "상" => Ok(Self::High),
            "중" => Ok(Self::Medium),
            "하" => Ok(Self::Low),
            other => Err(format!("unknown urgency level: {other}")),
        }
    }
}

/// Importance level stored in `request_design_change.importance_level`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImportanceLevel {
    High,
    Medium,
    Low,
}

impl ImportanceLevel {
    /// Parse a stored label. Anything other than the three known labels is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Importance shares the urgency axis on the combined chart.
    pub fn as_urgency(self) -> UrgencyLevel {
        match self {
            Self::High => UrgencyLevel::High,
            Self::Medium => UrgencyLevel::Medium,
            Self::Low => UrgencyLevel::Low,
        }
    }
}
