//! # Mutation Orchestrator
//!
//! Create, update and delete go straight to the gateway; once the backend
//! accepts a change the orchestrator notifies the user and asks the
//! controller for exactly one reload (first page for creates, with the
//! affected product named for highlighting).
//!
//! Validation failures come back as field errors for the form and never
//! trigger a reload or a notification.

mod confirm;
mod form;

pub use confirm::{AutoConfirm, Confirmation};
pub use form::ProductForm;

use crate::controller::{CatalogHandle, LoadStatus, ReloadRequest};
use crate::gateway::{GatewayError, ProductApi};
use crate::model::{FieldErrors, Product, ProductDraft, ProductId};
use catalog_runtime::{FrameworkError, Notifier};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// Field-level rejection; the form stays open and shows these.
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    Failed(String),

    #[error("Controller unavailable: {0}")]
    Controller(#[from] FrameworkError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("{0}")]
    Failed(String),

    #[error("Controller unavailable: {0}")]
    Controller(#[from] FrameworkError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Clone)]
pub struct MutationOrchestrator {
    api: Arc<dyn ProductApi>,
    controller: CatalogHandle,
    notifier: Notifier,
    confirmation: Arc<dyn Confirmation>,
}

impl MutationOrchestrator {
    pub fn new(
        api: Arc<dyn ProductApi>,
        controller: CatalogHandle,
        notifier: Notifier,
        confirmation: Arc<dyn Confirmation>,
    ) -> Self {
        Self {
            api,
            controller,
            notifier,
            confirmation,
        }
    }

    /// Creates (`editing == None`) or updates a product.
    ///
    /// On success returns the id queued for highlighting; a create whose
    /// response had no usable `Location` yields `None`.
    #[instrument(skip(self, editing), fields(editing = ?editing.map(|p| &p.id)))]
    pub async fn submit(
        &self,
        editing: Option<&Product>,
        draft: ProductDraft,
    ) -> Result<Option<ProductId>, SubmitError> {
        let (highlight, first_page, message) = match editing {
            Some(product) => {
                self.api
                    .update_product(&product.id, &draft)
                    .await
                    .map_err(|e| self.save_failed(e))?;
                (Some(product.id.clone()), false, "Updated successfully")
            }
            None => {
                let created = self
                    .api
                    .create_product(&draft)
                    .await
                    .map_err(|e| self.save_failed(e))?;
                let id = created.id();
                if id.is_none() {
                    debug!(location = ?created.location, "No id in Location, nothing to highlight");
                }
                (id, true, "Created successfully")
            }
        };

        info!(id = ?highlight, "{message}");
        self.notifier.success(message);
        let status = self
            .controller
            .reload(ReloadRequest::after_mutation(highlight.clone(), first_page))
            .await?;
        if let LoadStatus::Failed(error) = status {
            debug!(error = %error, "Reload after save failed");
        }
        Ok(highlight)
    }

    /// Deletes a product after the user confirms.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<DeleteOutcome, DeleteError> {
        let prompt = format!("Delete product #{id}?");
        if !self.confirmation.confirm(&prompt).await {
            info!(%id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.api.delete_product(id).await {
            Ok(()) => {
                info!(%id, "Deleted");
                self.notifier.success("Deleted product");
                self.controller
                    .reload(ReloadRequest::after_mutation(None, false))
                    .await?;
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                warn!(%id, error = %error, "Delete failed");
                let message = failure_message(&error, "Failed to delete product");
                self.notifier.error(message.clone());
                Err(DeleteError::Failed(message))
            }
        }
    }

    fn save_failed(&self, error: GatewayError) -> SubmitError {
        match error {
            GatewayError::Validation(errors) => {
                debug!(fields = errors.len(), "Rejected by validation");
                SubmitError::Validation(errors)
            }
            other => {
                warn!(error = %other, "Save failed");
                self.notifier.error("Failed to save product");
                SubmitError::Failed(failure_message(&other, "Failed to save product"))
            }
        }
    }
}

/// The server's message when it sent one, `fallback` otherwise.
fn failure_message(error: &GatewayError, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_server_text() {
        let error = GatewayError::Request {
            status: 409,
            message: "Product is referenced by an order".to_string(),
        };
        assert_eq!(
            failure_message(&error, "Failed to delete product"),
            "Product is referenced by an order"
        );

        let blank = GatewayError::Request {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(failure_message(&blank, "Failed to delete product"), "Failed to delete product");
    }
}
