use super::*;

#[test]
fn defaults_match_spec() {
    let config = Config::default();
    assert_eq!(config.max_final_results, 5);
    assert!((config.relevance_threshold - 0.3).abs() < f64::EPSILON);
    assert!((config.user_boost_factor - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.embed_concurrency, 5);
    assert_eq!(config.rpc_timeout, Duration::from_millis(5000));
    assert_eq!(config.health_interval, Duration::from_secs(30));
    assert_eq!(config.max_restarts, 5);
    assert_eq!(config.restart_delay, Duration::from_secs(5));
}

#[test]
fn default_collection_names() {
    let names = CollectionNames::default();
    assert_eq!(names.user, "user_keybindings");
    assert_eq!(names.builtin, "vim_knowledge");
    assert_eq!(names.general, "general_knowledge");
}

#[test]
fn validate_rejects_zero_max_final_results() {
    let mut config = Config::default();
    config.max_final_results = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_threshold() {
    let mut config = Config::default();
    config.relevance_threshold = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_embed_concurrency() {
    let mut config = Config::default();
    config.embed_concurrency = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}
