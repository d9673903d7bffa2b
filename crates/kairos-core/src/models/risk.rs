use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{LEGACY_RISK_SCALE_MAX, MAX_RISK_LEVEL};
use crate::errors::{KairosError, KairosResult};

/// Ordinal severity of a therapeutic session, 0 (none) to 5 (critical).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum RiskLevel {
    #[default]
    None = 0,
    Low = 1,
    Moderate = 2,
    Elevated = 3,
    High = 4,
    Critical = 5,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        Self::None,
        Self::Low,
        Self::Moderate,
        Self::Elevated,
        Self::High,
        Self::Critical,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Map a 0–10 assessment score onto the 0–5 scale, rounding up so that
    /// any non-zero score registers.
    pub fn from_ten_point_scale(score: u8) -> KairosResult<Self> {
        if score > LEGACY_RISK_SCALE_MAX {
            return Err(KairosError::InvalidRiskLevel {
                value: i64::from(score),
            });
        }
        Self::try_from(score.div_ceil(2))
    }

    /// Lower by `steps`, saturating at `None`.
    pub fn saturating_sub(self, steps: u64) -> Self {
        let lowered = u64::from(self.as_u8()).saturating_sub(steps);
        // Always in range: lowered <= self.
        Self::ALL[lowered as usize]
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = KairosError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_RISK_LEVEL {
            return Err(KairosError::InvalidRiskLevel {
                value: i64::from(value),
            });
        }
        Ok(Self::ALL[value as usize])
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Where a risk signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskSource {
    /// A clinician or structured instrument assessed the client.
    ExplicitAssessment,
    /// Derived from session content.
    Inferred,
}

impl RiskSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplicitAssessment => "explicit-assessment",
            Self::Inferred => "inferred",
        }
    }
}

/// An immutable risk signal, appended to its session's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEvent {
    pub session_id: String,
    pub level: RiskLevel,
    pub observed_at: DateTime<Utc>,
    pub source: RiskSource,
}

impl RiskEvent {
    pub fn new(
        session_id: impl Into<String>,
        level: RiskLevel,
        observed_at: DateTime<Utc>,
        source: RiskSource,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            level,
            observed_at,
            source,
        }
    }

    pub fn explicit(session_id: impl Into<String>, level: RiskLevel, at: DateTime<Utc>) -> Self {
        Self::new(session_id, level, at, RiskSource::ExplicitAssessment)
    }

    pub fn inferred(session_id: impl Into<String>, level: RiskLevel, at: DateTime<Utc>) -> Self {
        Self::new(session_id, level, at, RiskSource::Inferred)
    }
}

/// Direction of the risk level relative to one decay window earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    Rising,
    Stable,
    Falling,
}

/// Derived session risk state. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub session_id: String,
    pub level: RiskLevel,
    pub trend: RiskTrend,
    pub evaluated_at: DateTime<Utc>,
    /// Number of events considered.
    pub event_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_point_scale_rounds_up() {
        assert_eq!(RiskLevel::from_ten_point_scale(0).unwrap(), RiskLevel::None);
        assert_eq!(RiskLevel::from_ten_point_scale(1).unwrap(), RiskLevel::Low);
        assert_eq!(RiskLevel::from_ten_point_scale(7).unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::from_ten_point_scale(10).unwrap(), RiskLevel::Critical);
        assert!(RiskLevel::from_ten_point_scale(11).is_err());
    }

    #[test]
    fn saturating_sub_floors_at_none() {
        assert_eq!(RiskLevel::High.saturating_sub(1), RiskLevel::Elevated);
        assert_eq!(RiskLevel::Low.saturating_sub(10), RiskLevel::None);
    }

    #[test]
    fn level_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&RiskLevel::Elevated).unwrap(), "3");
        let parsed: RiskLevel = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, RiskLevel::Critical);
        assert!(serde_json::from_str::<RiskLevel>("6").is_err());
    }
}
