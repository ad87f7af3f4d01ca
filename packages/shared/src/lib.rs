//! Shared utilities for the sokudo typing-race application.
//!
//! Cross-cutting helpers used by both the server and the client:
//! timestamp handling with a clock abstraction, and logging setup.

pub mod logger;
pub mod time;
