//! Connection gateway handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_rooms, health_check};
pub use websocket::websocket_handler;
