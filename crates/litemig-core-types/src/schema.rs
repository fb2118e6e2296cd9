//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the runner, the
//! store and anything asserting on captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Version bookkeeping
pub const FIELD_CURRENT_VERSION: &str = "current_version";
pub const FIELD_LATEST_VERSION: &str = "latest_version";
pub const FIELD_FROM_VERSION: &str = "from_version";
pub const FIELD_TO_VERSION: &str = "to_version";
pub const FIELD_STEP_NAME: &str = "step_name";
pub const FIELD_STEPS_APPLIED: &str = "steps_applied";
pub const FIELD_CHECKSUM: &str = "checksum";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_STEP_APPLIED: &str = "step_applied";
