// Terminal helpers: a spinner shown while a request is in flight and the
// rendering of record content for stdout.
//
// The spinner draws on stderr and stays hidden when stderr is not a
// terminal, so piped output only ever contains the program's results.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

/// Run `f` while a spinner with `message` ticks on stderr.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}

/// Human-readable dump of a record's content. Strings are printed as-is so
/// stored source code keeps its line breaks; everything else is pretty JSON.
pub fn render_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
