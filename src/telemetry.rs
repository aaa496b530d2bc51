//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — operation invoked (currently only "classify")
//! - `status` — outcome: "ok", "rejected" (client error) or "error"
//! - `model` — classifier name

/// Total classification requests handled by the service.
///
/// Labels: `operation`, `status` ("ok" | "rejected" | "error").
pub const REQUESTS_TOTAL: &str = "mimir_requests_total";

/// Time spent in the model, in seconds. Rejected inputs are not timed.
///
/// Labels: `model`.
pub const INFERENCE_DURATION_SECONDS: &str = "mimir_inference_duration_seconds";
