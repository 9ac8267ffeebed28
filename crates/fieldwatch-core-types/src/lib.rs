//! Core types shared across fieldwatch facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! facility and by tests that assert on emitted events:
//!
//! - **Field keys**: component, op, event, duration and tracker counters
//! - **Event names**: start, end, end_error

pub mod schema;
