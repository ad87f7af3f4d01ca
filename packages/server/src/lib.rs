//! Room coordination engine for the sokudo multiplayer typing race.
//!
//! Players join a shared room over WebSocket, race against a common
//! paragraph, and see each other's progress live. This crate owns room
//! lifecycle, the roster, the game state machine, the progress-broadcast
//! protocol and ranking computation.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
