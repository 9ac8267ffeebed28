#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::person;
use fieldwatch_core::{ChangeTracker, ExErrorKind, TrackerConfig, UncapturedFieldPolicy};

#[test]
fn test_toml_config_drives_tracker() {
    let config = TrackerConfig::from_toml_str(
        r#"
        fields = ["Name", "Age", "Name"]
        uncaptured_fields = "report"
        "#,
    )
    .unwrap();

    let mut record = person("Alice", 30, "NY");
    let tracker = ChangeTracker::from_config(&record, &config).unwrap();
    assert_eq!(tracker.tracked_fields().collect::<Vec<_>>(), vec!["Age", "Name"]);

    record.name = "Alicia".to_string();
    let changes = tracker.changes(&record).unwrap();
    assert_eq!(changes.field_names().collect::<Vec<_>>(), vec!["Name"]);
}

#[test]
fn test_empty_toml_is_valid() {
    let config = TrackerConfig::from_toml_str("").unwrap();
    assert_eq!(config, TrackerConfig::default());
}

#[test]
fn test_unknown_policy_rejected() {
    let err = TrackerConfig::from_toml_str(r#"uncaptured_fields = "sometimes""#).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = TrackerConfig::new(["a"]).with_policy(UncapturedFieldPolicy::Ignore);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"ignore\""));
    let back: TrackerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
