//! Tracing/logging setup shared by binaries and tests.

pub mod tracing;

/// Env var selecting JSON log output (`1` or `true`).
pub const LOG_JSON_ENV: &str = "STOCKBOOK_LOG_JSON";

/// Initialize process-wide tracing/logging.
///
/// Emits JSON lines when [`LOG_JSON_ENV`] is set, plain single-line output
/// otherwise. Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let json = std::env::var(LOG_JSON_ENV)
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if json {
        tracing::init_json();
    } else {
        tracing::init();
    }
}
