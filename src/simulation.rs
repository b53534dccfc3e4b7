use serde::Serialize;
use std::collections::BTreeMap;

use crate::value::ParamValue;

/// Illustrative before/after outcome for one representative input row.
/// Derived arithmetically from the numeric parameters alone; no live data
/// source is consulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRecord {
    pub label: String,
    pub before_outcome: f64,
    pub after_outcome: f64,
}

/// Read-only preview of a set of proposed parameter changes. Computed on
/// demand and never persisted; a caller that wants a record of it can
/// quote the summary in an update reason.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub before: BTreeMap<String, ParamValue>,
    pub after: BTreeMap<String, ParamValue>,
    pub impact_summary: String,
    pub change_descriptions: Vec<String>,
    pub preview: Vec<PreviewRecord>,
}

const SAMPLE_ROWS: [(&str, f64); 3] = [
    ("low-signal item", 0.25),
    ("typical item", 0.5),
    ("high-signal item", 0.9),
];

/// Diff `before` against `before + changes`.
///
/// Proposed values are deliberately not validated against constraints: a
/// caller may preview an out-of-range value to see what it would do
/// before the update path rejects it. `ordered_names` fixes the output
/// order of the per-field descriptions to declaration order.
pub fn run(
    ordered_names: &[String],
    before: BTreeMap<String, ParamValue>,
    changes: &BTreeMap<String, ParamValue>,
) -> SimulationResult {
    let mut after = before.clone();
    for (name, value) in changes {
        after.insert(name.clone(), value.clone());
    }

    let mut change_descriptions = Vec::new();
    let mut changed_names = Vec::new();
    for name in ordered_names {
        let (Some(old), Some(new)) = (before.get(name), after.get(name)) else {
            continue;
        };
        if old == new {
            continue;
        }
        change_descriptions.push(describe_change(name, old, new));
        changed_names.push(name.clone());
    }

    let impact_summary = if changed_names.is_empty() {
        "No parameter changes proposed; the configuration is unchanged.".to_string()
    } else {
        format!(
            "{} of {} parameters would change: {}",
            changed_names.len(),
            ordered_names.len(),
            changed_names.join(", ")
        )
    };

    let preview = build_preview(&before, &after);

    SimulationResult {
        before,
        after,
        impact_summary,
        change_descriptions,
        preview,
    }
}

fn describe_change(name: &str, old: &ParamValue, new: &ParamValue) -> String {
    match (old.as_number(), new.as_number()) {
        (Some(before), Some(after)) if before != 0.0 => {
            let pct = (after - before) / before * 100.0;
            let direction = if pct >= 0.0 { "increase" } else { "decrease" };
            format!(
                "{}: {} -> {} ({}% {})",
                name,
                old,
                new,
                format_pct(pct.abs()),
                direction
            )
        }
        _ => format!("{}: {} -> {}", name, old, new),
    }
}

fn format_pct(pct: f64) -> String {
    let rounded = format!("{:.1}", pct);
    rounded
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(rounded)
}

/// Weighted sum of the numeric parameters for each fixed sample row.
/// A deterministic function of the two snapshots and nothing else, so
/// repeated simulations of the same proposal always agree.
fn build_preview(
    before: &BTreeMap<String, ParamValue>,
    after: &BTreeMap<String, ParamValue>,
) -> Vec<PreviewRecord> {
    let base_before = numeric_sum(before);
    let base_after = numeric_sum(after);

    SAMPLE_ROWS
        .iter()
        .map(|(label, weight)| PreviewRecord {
            label: label.to_string(),
            before_outcome: round3(base_before * weight),
            after_outcome: round3(base_after * weight),
        })
        .collect()
}

fn numeric_sum(snapshot: &BTreeMap<String, ParamValue>) -> f64 {
    snapshot.values().filter_map(ParamValue::as_number).sum()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, ParamValue)]) -> BTreeMap<String, ParamValue> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn numeric_delta_is_reported_as_a_percentage() {
        let before = snapshot(&[("threshold", ParamValue::Number(0.8))]);
        let changes = snapshot(&[("threshold", ParamValue::Number(0.9))]);
        let result = run(&["threshold".to_string()], before, &changes);

        assert_eq!(result.change_descriptions.len(), 1);
        assert!(
            result.change_descriptions[0].contains("12.5% increase"),
            "got: {}",
            result.change_descriptions[0]
        );
        assert_eq!(result.after["threshold"], ParamValue::Number(0.9));
        assert_eq!(result.before["threshold"], ParamValue::Number(0.8));
    }

    #[test]
    fn non_numeric_delta_is_old_to_new() {
        let before = snapshot(&[("strategy", ParamValue::Choice("hybrid".to_string()))]);
        let changes = snapshot(&[("strategy", ParamValue::Choice("content".to_string()))]);
        let result = run(&["strategy".to_string()], before, &changes);
        assert_eq!(result.change_descriptions, vec!["strategy: hybrid -> content"]);
    }

    #[test]
    fn zero_baseline_avoids_percentage_math() {
        let before = snapshot(&[("floor", ParamValue::Number(0.0))]);
        let changes = snapshot(&[("floor", ParamValue::Number(0.2))]);
        let result = run(&["floor".to_string()], before, &changes);
        assert_eq!(result.change_descriptions, vec!["floor: 0 -> 0.2"]);
    }

    #[test]
    fn unknown_keys_merge_into_after_but_produce_no_description() {
        let before = snapshot(&[("threshold", ParamValue::Number(0.8))]);
        let changes = snapshot(&[("surprise", ParamValue::Number(1.0))]);
        let result = run(&["threshold".to_string()], before, &changes);
        assert!(result.change_descriptions.is_empty());
        assert!(result.after.contains_key("surprise"));
        assert!(result.impact_summary.contains("unchanged"));
    }

    #[test]
    fn preview_is_deterministic_and_ordered() {
        let before = snapshot(&[
            ("decay", ParamValue::Number(0.4)),
            ("threshold", ParamValue::Number(0.6)),
        ]);
        let changes = snapshot(&[("threshold", ParamValue::Number(0.8))]);
        let names = vec!["decay".to_string(), "threshold".to_string()];

        let first = run(&names, before.clone(), &changes);
        let second = run(&names, before, &changes);
        assert_eq!(first.preview, second.preview);
        assert_eq!(first.preview.len(), 3);
        assert_eq!(first.preview[1].before_outcome, 0.5);
        assert_eq!(first.preview[1].after_outcome, 0.6);
    }

    #[test]
    fn out_of_range_values_are_previewable() {
        let before = snapshot(&[("threshold", ParamValue::Number(0.8))]);
        let changes = snapshot(&[("threshold", ParamValue::Number(99.0))]);
        let result = run(&["threshold".to_string()], before, &changes);
        assert_eq!(result.after["threshold"], ParamValue::Number(99.0));
        assert_eq!(result.change_descriptions.len(), 1);
    }
}
