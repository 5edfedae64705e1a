//! # Mailbox Mocks
//!
//! Utilities for testing code that talks to an actor without spawning the
//! actor. [`create_mock_mailbox`] returns a real [`Mailbox`] plus the raw
//! receiver; the test plays the actor by pulling messages with
//! [`expect_message`] and answering their response channels by hand.
//!
//! ```rust
//! use catalog_runtime::mock::{create_mock_mailbox, expect_message};
//! use catalog_runtime::Response;
//!
//! #[derive(Debug)]
//! enum Command {
//!     Refresh { respond_to: Response<bool> },
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (mailbox, mut receiver) = create_mock_mailbox::<Command>(8);
//!
//! let caller = tokio::spawn(async move {
//!     mailbox.ask(|respond_to| Command::Refresh { respond_to }).await
//! });
//!
//! let Command::Refresh { respond_to } = expect_message(&mut receiver)
//!     .await
//!     .expect("Expected Refresh command");
//! respond_to.send(true).unwrap();
//!
//! assert_eq!(caller.await.unwrap(), Ok(true));
//! # }
//! ```

use crate::mailbox::Mailbox;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// How long [`expect_message`] waits before concluding nothing was sent.
pub const EXPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a mailbox whose messages land in the returned receiver.
pub fn create_mock_mailbox<M>(buffer_size: usize) -> (Mailbox<M>, mpsc::Receiver<M>) {
    Mailbox::channel(buffer_size)
}

/// Waits for the next message, giving up after [`EXPECT_TIMEOUT`].
pub async fn expect_message<M>(receiver: &mut mpsc::Receiver<M>) -> Option<M> {
    timeout(EXPECT_TIMEOUT, receiver.recv()).await.ok().flatten()
}

/// Asserts that nothing is waiting in the mailbox right now.
pub fn expect_no_message<M: std::fmt::Debug>(receiver: &mut mpsc::Receiver<M>) {
    if let Ok(message) = receiver.try_recv() {
        panic!("Unexpected message: {message:?}");
    }
}
