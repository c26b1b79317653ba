//! Tracing setup shared by the MDES crates.
//!
//! Operations that read or compare specifications (`load_schema`,
//! `resolve`, `build_specification`, `diff_specifications`, and the store's
//! `read_specification`) bracket their work with [`log_op_start!`],
//! [`log_op_end!`] and [`log_op_error!`]. Each record carries `op`, `event`
//! and `component` fields so a subscriber can pull a single operation out of
//! the stream.
//!
//! Schema anomalies travel separately, through
//! [`TracingSink`](crate::warnings::TracingSink), as `event = "warning"` or
//! `event = "severe"` records on the same subscriber.
//!
//! ```rust
//! use mdes_core::logging_facility::{init, Profile};
//!
//! // false when the host application already installed a subscriber
//! let _installed = init(Profile::Development);
//! ```
//!
//! [`log_op_start!`]: crate::log_op_start
//! [`log_op_end!`]: crate::log_op_end
//! [`log_op_error!`]: crate::log_op_error

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile, LOG_ENV_VAR};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
