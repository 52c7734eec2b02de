//! Sessions: the action queue, per-session coordinator, and registry.

pub mod action;
pub mod coordinator;
pub mod registry;

pub use action::{ActionKind, Committed, GameAction, SessionEvent};
pub use coordinator::{spawn_session, SessionConfig, SessionHandle, SessionId};
pub use registry::SessionRegistry;
