//! # Logging
//!
//! Every component logs through `tracing` with structured fields rather than
//! interpolated text, so a request can be followed across stages by filtering on
//! `resource`, `event` or `stage`:
//!
//! ```text
//! INFO Registered path="/widgets" resource="WidgetResource" rest=true events=4
//! DEBUG Entering stage resource="WidgetResource" stage=Resolution
//! WARN Method not supported resource="WidgetResource" method="PATCH"
//! INFO Request complete resource="WidgetResource" method="PATCH" event=None status=405
//! ```
//!
//! | Level | Used for |
//! |-------|----------|
//! | `debug` | per-stage flow, dispatch decisions, bound values |
//! | `info` | registration, controller start and shutdown, completed requests |
//! | `warn` | rejected requests (405, 404, 400) |
//! | `error` | uncaught failures answered with a 500 |
//!
//! Set `RUST_LOG` to pick the verbosity, e.g. `RUST_LOG=rest_framework=debug`.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
