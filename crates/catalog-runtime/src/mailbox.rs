//! # Generic Mailbox Client
//!
//! [`Mailbox<M>`] is the client half of an actor: a cloneable wrapper around
//! the sender of a bounded Tokio channel. It offers fire-and-forget delivery
//! ([`Mailbox::send`]) and request/response ([`Mailbox::ask`]) where the actor
//! answers through a [`Response`](crate::Response) embedded in the message.
//!
//! Domain code wraps a `Mailbox<Command>` in a typed handle so the rest of the
//! application never builds raw messages.

use crate::error::FrameworkError;
use crate::message::Response;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for delivering messages of type `M` to one actor.
pub struct Mailbox<M> {
    sender: mpsc::Sender<M>,
}

// Manual impl: `M` itself does not need to be `Clone`.
impl<M> Clone for Mailbox<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M> Mailbox<M> {
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self { sender }
    }

    /// Creates a mailbox and the receiver the actor loop will drain.
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<M>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self::new(sender), receiver)
    }

    /// Delivers a message without waiting for the actor to process it.
    pub async fn send(&self, message: M) -> Result<(), FrameworkError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Delivers a message built around a fresh response channel and waits
    /// for the actor's answer.
    pub async fn ask<T>(
        &self,
        build: impl FnOnce(Response<T>) -> M,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.send(build(respond_to)).await?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// Returns `true` once the actor has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
