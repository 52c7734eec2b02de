//! Four-player, round-based tile-capture session engine.
//!
//! Each round runs Preparation (deal + weak-hand redeal negotiation),
//! Declaration (pile targets), Turn (trick play), and Scoring. A session's
//! state is owned by a single coordinator task; all mutation flows through
//! its action queue, and every committed action is announced with exactly
//! one full-state broadcast.
//!
//! Transport, room lifecycle, persistence, and rendering are external
//! collaborators: they submit [`session::GameAction`]s and consume
//! [`session::SessionEvent`]s.

pub mod bot;
pub mod config;
pub mod domain;
pub mod errors;
pub mod session;
pub mod telemetry;
