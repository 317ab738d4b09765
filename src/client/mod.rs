//! Typed client for the REST API plus the transient-alert queue; the
//! stand-in for the original browser frontend. No global token storage:
//! callers hold a `Session` and pass it into each authenticated call.

pub mod alerts;
pub mod api;
