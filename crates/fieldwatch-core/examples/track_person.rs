//! Change Tracker Demonstration
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Snapshots two fields of a record, mutates it, and prints the change report
//! and its Markdown summary.

use fieldwatch_core::{
    logging_facility::{init, Profile},
    render_change_summary, ChangeTracker, TrackerConfig,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
    name: String,
    age: u32,
    city: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    println!("=== fieldwatch Demo ===\n");

    let mut person = Person {
        name: "Alice".to_string(),
        age: 30,
        city: "NY".to_string(),
    };

    let config = TrackerConfig::from_toml_str(r#"fields = ["Name", "Age"]"#)?;
    let tracker = ChangeTracker::from_config(&person, &config)?;
    println!(
        "Tracking: {}",
        tracker.tracked_fields().collect::<Vec<_>>().join(", ")
    );

    person.age = 31;
    person.city = "LA".to_string();

    let changes = tracker.changes(&person)?;
    println!("Changes (JSON): {}", serde_json::to_string(&changes)?);
    println!();
    println!("{}", render_change_summary(&changes));

    match ChangeTracker::new(&42, ["Age"]) {
        Ok(_) => println!("unexpected: a number was accepted as a record"),
        Err(e) => println!("Rejected non-record source: {}", e),
    }

    Ok(())
}
