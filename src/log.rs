//! logfmt lines on stderr for the optimizer and its passes.
//!
//! Every line carries a wall-clock `time`, a coloured `level` and the `tag`
//! of its emitter: `optimizer` for per-pass totals, or the pass name
//! (`remove_super_methods`) for per-candidate decisions and run summaries.
//! Callers check the configured [`LogLevel`](crate::config::LogLevel) before
//! logging; the macros themselves always print.
//!
//! ```ignore
//! log_debug!("remove_super_methods", method = "Foo.prototype.bar", decision = "kept", reason = "suppressed");
//! // time=12:34:56.789 level=debug tag=remove_super_methods method=Foo.prototype.bar decision=kept reason=suppressed
//! ```

use std::time::SystemTime;

use colored::Colorize;
use itertools::Itertools as _;

pub fn format_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs() % 86400;
    let hours = (secs / 3600) % 24;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    let millis = now.subsec_millis();
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// `key=value` pairs joined by spaces, led by the `time`, `level` and `tag` keys
pub fn format_logfmt(level: &str, tag: &str, fields: &[(&str, String)]) -> String {
    let leading = [
        ("time", format_timestamp()),
        ("level", level.to_string()),
        ("tag", tag.to_string()),
    ];
    leading
        .iter()
        .chain(fields)
        .map(|(key, value)| format!("{}={}", key.dimmed(), value))
        .join(" ")
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $tag:expr, $($key:ident = $value:expr),*) => {
        eprintln!(
            "{}",
            $crate::log::format_logfmt(
                &$level.to_string(),
                $tag,
                &[$((stringify!($key), $value.to_string())),*],
            )
        )
    };
}

/// Per-run summaries
#[macro_export]
macro_rules! log_info {
    ($tag:expr, $($key:ident = $value:expr),* $(,)?) => {{
        use colored::Colorize;
        $crate::__log_at!("info".cyan(), $tag, $($key = $value),*)
    }};
}

/// Per-candidate decisions
#[macro_export]
macro_rules! log_debug {
    ($tag:expr, $($key:ident = $value:expr),* $(,)?) => {{
        use colored::Colorize;
        $crate::__log_at!("debug".dimmed(), $tag, $($key = $value),*)
    }};
}
