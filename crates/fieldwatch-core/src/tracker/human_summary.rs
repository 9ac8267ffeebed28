//! Human-readable summary renderer for change sets.

use crate::tracker::model::{ChangeSet, PriorValue};

/// Render a Markdown/text summary of a [`ChangeSet`].
///
/// Informational only; values are rendered as compact JSON.
pub fn render_change_summary(changes: &ChangeSet) -> String {
    let mut out = String::new();

    out.push_str("## Field Changes\n\n");

    if changes.is_empty() {
        out.push_str("_No tracked fields changed._\n");
        return out;
    }

    out.push_str(&format!("**Changed fields**: {}\n\n", changes.len()));
    out.push_str("| Field | Original |\n|---|---|\n");
    for (field, prior) in changes.iter() {
        let original = match prior {
            PriorValue::Captured(value) => format!("`{}`", value),
            PriorValue::NotCaptured => "_not captured_".to_string(),
        };
        out.push_str(&format!("| `{}` | {} |\n", field, original));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_summary() {
        let summary = render_change_summary(&ChangeSet::new());
        assert!(summary.starts_with("## Field Changes"));
        assert!(summary.contains("No tracked fields changed"));
    }

    #[test]
    fn test_rows_for_each_change() {
        let mut set = ChangeSet::new();
        set.record("Age", PriorValue::Captured(json!(30)));
        set.record("Nick", PriorValue::NotCaptured);
        let summary = render_change_summary(&set);
        assert!(summary.contains("**Changed fields**: 2"));
        assert!(summary.contains("| `Age` | `30` |"));
        assert!(summary.contains("| `Nick` | _not captured_ |"));
    }
}
