//! # Product Catalog Client
//!
//! Client-side state for browsing and editing a paginated product catalog
//! served by a REST backend.
//!
//! - **[model]**: products, page results and query parameters.
//! - **[gateway]**: the [`ProductApi`](gateway::ProductApi) trait, its
//!   `reqwest` implementation and a scripted mock.
//! - **[controller]**: the actor owning query/pagination state, debounced
//!   search, stale-response suppression and row highlighting.
//! - **[mutation]**: create/update/delete followed by a single reload, plus
//!   the product form.
//! - **[lifecycle]**: [`CatalogSystem`](lifecycle::CatalogSystem) start and
//!   shutdown.
//!
//! Logging goes through `tracing`; install a subscriber with
//! [`catalog_runtime::tracing::setup_tracing`].

pub mod config;
pub mod controller;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod mutation;

pub use config::{ClientConfig, ConfigError};
pub use controller::{CatalogHandle, LoadStatus, ReloadReason, ReloadRequest, ViewState};
pub use lifecycle::CatalogSystem;
pub use mutation::{DeleteError, DeleteOutcome, MutationOrchestrator, ProductForm, SubmitError};
