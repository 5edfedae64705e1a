//! # Reply Channels
//!
//! Request/response messages carry a one-shot sender that the actor completes
//! once it has processed the request.

use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<T>;

/// Completes a response channel, ignoring a caller that stopped waiting.
///
/// Callers are free to drop their receiver (for example when a UI gives up on
/// a pending reload), so a failed send is not an error for the actor.
pub fn reply<T>(respond_to: Response<T>, value: T) {
    let _ = respond_to.send(value);
}
