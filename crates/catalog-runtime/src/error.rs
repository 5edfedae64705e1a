//! # Framework Errors
//!
//! Errors raised by the runtime plumbing itself, independent of any domain.
//! Domain layers wrap these in their own error enums.

/// Errors that can occur while talking to an actor through its mailbox.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}
