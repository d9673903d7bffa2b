/// Kairos engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wildcard tag: a source carrying it matches every requested tag of that dimension.
pub const WILDCARD_TAG: &str = "all";

/// Specialization tag identifying crisis-protocol sources.
pub const CRISIS_SPECIALIZATION: &str = "crisis";

/// Lowest possible risk level on the 0–5 scale.
pub const MIN_RISK_LEVEL: u8 = 0;

/// Highest possible risk level on the 0–5 scale.
pub const MAX_RISK_LEVEL: u8 = 5;

/// Highest value on the legacy ten-point assessment scale.
pub const LEGACY_RISK_SCALE_MAX: u8 = 10;
