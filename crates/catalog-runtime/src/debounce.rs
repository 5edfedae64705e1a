//! # Debounce
//!
//! [`Debounced<T>`] is a lazily-updated mirror of a rapidly changing value.
//! Every [`Debounced::push`] restarts the delay; the mirror only adopts the
//! newest input once the delay has elapsed without another push. The owner
//! awaits [`Debounced::settled`] (typically as one branch of a `select!`) to
//! learn when the mirror moved.

use crate::timer::PendingTimer;
use std::time::Duration;

/// A value stabilizer with a fixed quiet period.
#[derive(Debug)]
pub struct Debounced<T> {
    current: T,
    delay: Duration,
    pending: PendingTimer<T>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            current: initial,
            delay,
            pending: PendingTimer::new(),
        }
    }

    /// The last value that survived a full quiet period.
    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feeds a new raw value, cancelling any emission still pending.
    pub fn push(&mut self, value: T) {
        self.pending.arm(value, self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_armed()
    }

    /// Resolves with the new mirror value once the quiet period elapses.
    ///
    /// A settled value equal to the current mirror is swallowed, so callers
    /// only wake for real changes. Cancel-safe.
    pub async fn settled(&mut self) -> T {
        loop {
            let value = self.pending.fired().await;
            if value != self.current {
                self.current = value.clone();
                return value;
            }
        }
    }
}
