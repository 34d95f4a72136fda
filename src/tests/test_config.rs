use crate::config::DqnConfig;
use crate::error::SisyphusError;

#[test]
fn test_default_config_matches_reference_run() {
    let config = DqnConfig::default();

    assert_eq!(config.discount_factor, 0.95);
    assert_eq!(config.learning_rate, 0.001);
    assert_eq!(config.hidden_sizes, vec![30, 30]);
    assert_eq!(config.buffer_capacity, 50_000);
    assert_eq!(config.batch_size, 32);
    assert_eq!(config.epsilon_max, 1.0);
    assert_eq!(config.epsilon_min, 0.001);
    assert_eq!(config.epsilon_decay, 0.997);
    assert_eq!(config.max_episode_steps, 10_000);
    assert_eq!(config.time_budget().as_secs(), 7_200);
    assert_eq!(config.score_window, 30);
    assert_eq!(config.stop_below_mean, 200.0);
    assert_eq!(config.window_sentinel, Some(10_000.0));
    assert_eq!(config.max_episodes, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_json_round_trip() {
    let config = DqnConfig {
        batch_size: 8,
        hidden_sizes: vec![12],
        max_episodes: Some(3),
        ..DqnConfig::default()
    };
    let json = config.to_json().unwrap();
    let parsed: DqnConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    std::fs::write(&path, r#"{ "batch_size": 64, "seed": 9 }"#).unwrap();

    let config = DqnConfig::from_file(&path).unwrap();
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.seed, 9);
    assert_eq!(config.buffer_capacity, 50_000);
}

#[test]
fn test_config_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = DqnConfig::from_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(SisyphusError::Io(_))));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(DqnConfig::from_file(&path), Err(SisyphusError::Config(_))));

    let path = dir.path().join("invalid.json");
    std::fs::write(&path, r#"{ "batch_size": 0 }"#).unwrap();
    assert!(matches!(DqnConfig::from_file(&path), Err(SisyphusError::InvalidParameter { .. })));
}

#[test]
fn test_validation_rejects_bad_values() {
    let bad = [
        DqnConfig { discount_factor: 1.5, ..DqnConfig::default() },
        DqnConfig { learning_rate: 0.0, ..DqnConfig::default() },
        DqnConfig { hidden_sizes: vec![], ..DqnConfig::default() },
        DqnConfig { hidden_sizes: vec![30, 0], ..DqnConfig::default() },
        DqnConfig { buffer_capacity: 0, ..DqnConfig::default() },
        DqnConfig { batch_size: 100, buffer_capacity: 10, ..DqnConfig::default() },
        DqnConfig { epsilon_min: 0.5, epsilon_max: 0.1, ..DqnConfig::default() },
        DqnConfig { epsilon_max: 1.5, ..DqnConfig::default() },
        DqnConfig { epsilon_decay: 1.2, ..DqnConfig::default() },
        DqnConfig { max_episode_steps: 0, ..DqnConfig::default() },
        DqnConfig { score_window: 0, ..DqnConfig::default() },
    ];
    for config in bad.iter() {
        assert!(config.validate().is_err(), "accepted {:?}", config);
    }
}

#[test]
fn test_prepare_output_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let config = DqnConfig {
        model_dir: dir.path().join("save_model"),
        graph_dir: dir.path().join("nested").join("save_graph"),
        ..DqnConfig::default()
    };

    config.prepare_output_dirs().unwrap();
    assert!(config.model_dir.is_dir());
    assert!(config.graph_dir.is_dir());

    // Existing directories are left alone
    config.prepare_output_dirs().unwrap();
    assert_eq!(std::fs::read_dir(&config.model_dir).unwrap().count(), 0);
}
