use kairos_core::config::*;
use kairos_core::errors::ConfigError;
use kairos_core::KairosError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = KairosConfig::from_toml("").unwrap();

    // Selection defaults
    assert_eq!(config.selection.min_reliability, 0.8);
    assert_eq!(config.selection.reliability_weight, 0.6);
    assert_eq!(config.selection.overlap_weight, 0.4);

    // Cache defaults
    assert_eq!(config.cache.ttl_secs, 86_400);
    assert_eq!(config.cache.ttl(), std::time::Duration::from_secs(86_400));
    assert_eq!(config.cache.capacity_weight, 10_000);

    // Risk defaults
    assert_eq!(config.risk.decay_window_secs, 172_800);
    assert_eq!(config.risk.decay_window(), chrono::Duration::hours(48));
    assert!(config.risk.critical_sticky);
    assert_eq!(config.risk.crisis_threshold, 5);

    // Retrieval defaults
    assert_eq!(config.retrieval.fan_out_limit, 5);
    assert_eq!(config.retrieval.max_results, 10);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.json_logs);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[cache]
ttl_secs = 600

[risk]
critical_sticky = false
"#;
    let config = KairosConfig::from_toml(toml).unwrap();
    assert_eq!(config.cache.ttl_secs, 600);
    // Non-overridden fields keep defaults
    assert_eq!(config.cache.capacity_weight, 10_000);
    assert!(!config.risk.critical_sticky);
    assert_eq!(config.risk.decay_window_secs, 172_800);
}

#[test]
fn config_serde_roundtrip() {
    let config = KairosConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = KairosConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.retrieval.fan_out_limit, config.retrieval.fan_out_limit);
    assert_eq!(roundtripped.selection.min_reliability, config.selection.min_reliability);
}

#[test]
fn config_rejects_out_of_range_reliability() {
    let err = KairosConfig::from_toml("[selection]\nmin_reliability = 1.5\n").unwrap_err();
    assert!(matches!(err, KairosError::Config(_)));
    assert!(err.to_string().contains("min_reliability"));
}

#[test]
fn config_rejects_zero_decay_window_and_fan_out() {
    assert!(KairosConfig::from_toml("[risk]\ndecay_window_secs = 0\n").is_err());
    assert!(KairosConfig::from_toml("[retrieval]\nfan_out_limit = 0\n").is_err());
    assert!(KairosConfig::from_toml("[risk]\ncrisis_threshold = 6\n").is_err());
}

#[test]
fn config_rejects_malformed_toml() {
    let err = KairosConfig::from_toml("[cache\nttl_secs = ").unwrap_err();
    assert!(matches!(err, KairosError::Config(ConfigError::Parse { .. })));
}

#[test]
fn config_load_reports_missing_file() {
    let err = KairosConfig::load(std::path::Path::new("/nonexistent/kairos.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/kairos.toml"));
}
