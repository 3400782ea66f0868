//! Deterministic, pure logic shared by the bootstrapper.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod platform;
pub mod types;
