//! # Single-Shot Timers
//!
//! [`PendingTimer<T>`] holds at most one armed delay together with the value it
//! will deliver. It is meant to live inside an actor and be polled from the
//! actor's `select!` loop:
//!
//! ```rust
//! use catalog_runtime::PendingTimer;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let mut clear_mark = PendingTimer::new();
//! clear_mark.arm("row-42", Duration::from_millis(1800));
//!
//! tokio::select! {
//!     id = clear_mark.fired() => assert_eq!(id, "row-42"),
//! }
//! assert!(!clear_mark.is_armed());
//! # }
//! ```
//!
//! Re-arming replaces the previous delay and value, [`PendingTimer::cancel`]
//! discards it, and dropping the timer (actor teardown) means nothing is ever
//! delivered.

use std::future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep_until, Instant, Sleep};

/// A cancellable single-shot delay carrying the value to emit on expiry.
#[derive(Debug)]
pub struct PendingTimer<T> {
    armed: Option<(Pin<Box<Sleep>>, T)>,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingTimer<T> {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Arms the timer, superseding any delay that was still pending.
    pub fn arm(&mut self, value: T, after: Duration) {
        let deadline = Instant::now() + after;
        self.armed = Some((Box::pin(sleep_until(deadline)), value));
    }

    /// Disarms the timer and hands back the value that would have fired.
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|(_, value)| value)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// The value waiting to be delivered, if any.
    pub fn pending(&self) -> Option<&T> {
        self.armed.as_ref().map(|(_, value)| value)
    }

    /// Resolves with the armed value once its delay elapses.
    ///
    /// Never resolves while disarmed. Cancel-safe: dropping the future before
    /// completion leaves the timer armed with its original deadline.
    pub async fn fired(&mut self) -> T {
        if let Some((sleep, _)) = self.armed.as_mut() {
            sleep.as_mut().await;
        }
        match self.armed.take() {
            Some((_, value)) => value,
            None => future::pending().await,
        }
    }
}
