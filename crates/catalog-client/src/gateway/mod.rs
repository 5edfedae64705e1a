//! # Remote Data Gateway
//!
//! The backend is reached through the [`ProductApi`] trait so the controller
//! and orchestrator can run against [`HttpGateway`] in production and
//! [`mock::MockGateway`] in tests.
//!
//! Every call is a single attempt; retrying is the caller's decision.

pub mod http;
pub mod mock;

pub use http::{parse_id_from_location, HttpGateway};

use crate::model::{FieldErrors, PageResult, ProductDraft, ProductId, QueryParameters};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the gateway.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Transport failure, an undecodable body, or a failed listing. Carries the
    /// HTTP status when the server answered at all.
    #[error("{message}")]
    Network { status: Option<u16>, message: String },

    /// A mutation was refused with something other than a validation error.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The backend rejected the payload (HTTP 400) with per-field messages.
    #[error("Validation failed")]
    Validation(FieldErrors),
}

impl GatewayError {
    pub(crate) fn network(error: impl std::fmt::Display) -> Self {
        GatewayError::Network {
            status: None,
            message: error.to_string(),
        }
    }

    pub(crate) fn http_status(status: u16) -> Self {
        GatewayError::Network {
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }

    /// The HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Network { status, .. } => *status,
            GatewayError::Request { status, .. } => Some(*status),
            GatewayError::Validation(_) => Some(400),
        }
    }
}

/// Result of a successful create: the `Location` header, if the server sent one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Created {
    pub location: Option<String>,
}

impl Created {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
        }
    }

    /// Identifier of the new product, taken from the trailing path segment of
    /// the location pointer.
    pub fn id(&self) -> Option<ProductId> {
        self.location.as_deref().and_then(parse_id_from_location)
    }
}

/// The four backend operations the client relies on.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetches one page, using the search endpoint when the query has text.
    async fn list_products(&self, params: &QueryParameters) -> Result<PageResult, GatewayError>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<Created, GatewayError>;

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<(), GatewayError>;

    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError>;
}
