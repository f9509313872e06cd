//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the logging macros,
//! the error facility, and tests that assert on captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Migration identifiers
pub const FIELD_VERSION: &str = "version";
pub const FIELD_SCRIPT: &str = "script";

// Counters
pub const FIELD_LOCAL_COUNT: &str = "local_count";
pub const FIELD_LEDGER_COUNT: &str = "ledger_count";
pub const FIELD_APPLIED_COUNT: &str = "applied_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
