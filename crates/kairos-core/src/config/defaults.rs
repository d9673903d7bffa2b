// Single source of truth for all default values.

// --- Selection ---
pub const DEFAULT_MIN_RELIABILITY: f64 = 0.8;
pub const DEFAULT_RELIABILITY_WEIGHT: f64 = 0.6;
pub const DEFAULT_OVERLAP_WEIGHT: f64 = 0.4;

// --- Cache ---
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_CACHE_CAPACITY_WEIGHT: u64 = 10_000;

// --- Risk ---
pub const DEFAULT_DECAY_WINDOW_SECS: u64 = 172_800; // 48 hours
pub const DEFAULT_CRITICAL_STICKY: bool = true;
pub const DEFAULT_CRISIS_THRESHOLD: u8 = 5;

// --- Retrieval ---
pub const DEFAULT_FAN_OUT_LIMIT: usize = 5;
pub const DEFAULT_MAX_RESULTS: usize = 10;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
