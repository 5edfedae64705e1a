//! Destructive actions ask a [`Confirmation`] first. A terminal UI prompts on
//! stdin, a test answers from a script.

use async_trait::async_trait;

#[async_trait]
pub trait Confirmation: Send + Sync {
    /// Returns `true` to proceed.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
