//! Prometheus text exposition encoder.
//!
//! Pure functions over [`CounterSnapshot`]s. Output for an unchanged snapshot is
//! byte-identical across calls: rows are already sorted by [`LabelKey`] and
//! label pairs by name.
//!
//! ```text
//! # HELP <name> <description>
//! # TYPE <name> counter
//! <name>{k1="v1",k2="v2"} <value>
//! <name> <value>
//! ```

use std::fmt::Write;

use super::counter::CounterSnapshot;
use super::labels::LabelKey;

/// Escape a label value (`\`, `"`, newline).
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text (`\`, newline).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render the `{k="v",...}` selector for a key; empty for the label-free series.
pub fn label_selector(key: &LabelKey) -> String {
    if key.is_empty() {
        return String::new();
    }
    let body = key
        .pairs()
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{body}}}")
}

/// Append one counter block to `out`.
pub fn encode_into(snapshot: &CounterSnapshot, out: &mut String) {
    let name = &snapshot.name;
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(&snapshot.description));
    let _ = writeln!(out, "# TYPE {} counter", name);
    for (key, value) in &snapshot.rows {
        let _ = writeln!(out, "{}{} {}", name, label_selector(key), value);
    }
}

/// Render one counter block.
pub fn encode(snapshot: &CounterSnapshot) -> String {
    let mut out = String::new();
    encode_into(snapshot, &mut out);
    out
}

/// Render several counter blocks in the given order, separated by blank lines.
pub fn encode_all(snapshots: &[CounterSnapshot]) -> String {
    let mut out = String::new();
    for (i, snapshot) in snapshots.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        encode_into(snapshot, &mut out);
    }
    out
}
