//! # Catalog Runtime
//!
//! Domain-free building blocks for single-owner UI state actors on Tokio.
//!
//! An actor owns its state exclusively and processes one event at a time, so
//! no locks guard that state. Everything else in the process talks to it
//! through a cloneable [`Mailbox`] and waits for answers on one-shot
//! [`Response`] channels.
//!
//! ## Building Blocks
//!
//! - [`Mailbox`] / [`Response`] / [`FrameworkError`]: typed request/response
//!   messaging between tasks.
//! - [`PendingTimer`]: a cancellable single-shot delay to poll from `select!`.
//! - [`Debounced`]: a value mirror that settles after a quiet period.
//! - [`Generation`] / [`Ticket`]: monotonically increasing request tokens so
//!   that stale asynchronous results can be recognised and discarded.
//! - [`Notifier`] / [`NotificationFeed`]: an injected channel for transient
//!   user-facing messages.
//! - [`tracing::setup_tracing`]: compact structured logging driven by
//!   `RUST_LOG`.
//!
//! ## Teardown
//!
//! Timers and debouncers are plain values owned by the actor. When the actor's
//! mailbox closes its loop returns, the values drop, and no pending emission
//! can fire afterwards.
//!
//! ## Testing
//!
//! Timer-driven code is tested with `#[tokio::test(start_paused = true)]` and
//! `tokio::time::advance`. The [`mock`] module lets a test stand in for an
//! actor on the other end of a [`Mailbox`].

pub mod debounce;
pub mod error;
pub mod generation;
pub mod mailbox;
pub mod message;
pub mod mock;
pub mod notify;
pub mod timer;
pub mod tracing;

pub use debounce::Debounced;
pub use error::FrameworkError;
pub use generation::{Generation, Ticket};
pub use mailbox::Mailbox;
pub use message::{reply, Response};
pub use notify::{
    notification_channel, Level, Notification, NotificationFeed, Notifier,
    DEFAULT_NOTIFICATION_TTL,
};
pub use timer::PendingTimer;
