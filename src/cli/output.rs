//! Rendering of `grit-interview` command results.
//!
//! Every command produces one value that renders either as text for a
//! terminal or as pretty JSON when `--json` is set.

use serde::Serialize;

/// A command result printable in both output modes.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Renders `result` for the selected mode, without a trailing newline.
pub fn render<T: CommandOutput>(result: &T, json_mode: bool) -> String {
    if json_mode {
        serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
    } else {
        result.to_human().trim_end().to_string()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    println!("{}", render(result, json_mode));
}
