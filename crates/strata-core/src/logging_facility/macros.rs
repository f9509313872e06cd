//! Canonical logging macros
//!
//! Every top-level operation logs exactly one `start` and one `end` or
//! `end_error` event.

/// Log the start of an operation
///
/// ```
/// # use strata_core::log_op_start;
/// log_op_start!("migrate");
/// log_op_start!("migrate", table = "goflyway_schema_history");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use strata_core::log_op_end;
/// log_op_end!("migrate", duration_ms = 42);
/// log_op_end!("migrate", duration_ms = 42, applied_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError`, including `&MigrateError`.
///
/// ```
/// # use strata_core::log_op_error;
/// # use strata_core::errors::{MigrateError, ValidationError};
/// let err = MigrateError::from(ValidationError::OutOfOrder { version: "2".to_string() });
/// log_op_error!("migrate", &err, duration_ms = 10);
/// log_op_error!("migrate", &err, duration_ms = 10, version = "2");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            "{}",
            ex_err.message()
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*,
            "{}",
            ex_err.message()
        );
    }};
}
