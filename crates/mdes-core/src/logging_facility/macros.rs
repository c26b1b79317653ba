//! Operation boundary macros.
//!
//! All three expand through `__mdes_op_event!`, which stamps
//! `component = module_path!()`, `op` and one of the event names from
//! `mdes_core_types::schema`.

#[doc(hidden)]
#[macro_export]
macro_rules! __mdes_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Marks the start of an operation.
///
/// ```
/// # use mdes_core::log_op_start;
/// log_op_start!("load_schema");
/// log_op_start!("load_schema", mdes_version = "2.0");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__mdes_op_event!(
            info,
            $op,
            $crate::mdes_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Marks the successful end of an operation; `duration_ms` comes first.
///
/// ```
/// # use mdes_core::log_op_end;
/// log_op_end!("resolve", duration_ms = 42);
/// log_op_end!("resolve", duration_ms = 42, linked_foreign_keys = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__mdes_op_event!(
            info,
            $op,
            $crate::mdes_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Marks a failed operation.
///
/// The error is converted into [`ExError`](crate::errors::ExError) so the
/// record carries its kind and stable code.
///
/// ```
/// # use mdes_core::{log_op_error, errors::MdesError};
/// let err = MdesError::UnsupportedVersion { version: "1.0".to_string() };
/// log_op_error!("source_documents", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failure: $crate::errors::ExError = $err.into();
        $crate::__mdes_op_event!(
            error,
            $op,
            $crate::mdes_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?failure.kind(),
            err.code = failure.code()
            $(, $($field)*)?
        )
    }};
}
