//! Tracing subscriber setup for the console binaries.
//!
//! `RUST_LOG` controls filtering (default `info`). Setting
//! `CMMS_LOG_FORMAT=json` switches to one JSON object per line, which is what
//! the scheduler's log shipper expects.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CMMS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // try_init so a second call (e.g. from tests) is harmless
    let result = if json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if let Err(e) = result {
        eprintln!("[logging] subscriber already installed: {}", e);
    }
}
