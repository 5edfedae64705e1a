//! # System Lifecycle
//!
//! [`CatalogSystem`] wires the pieces together: it spawns the controller
//! actor (which issues the initial load), builds the mutation orchestrator
//! around the same gateway, and owns the receiving ends the UI reads from.
//!
//! Shutdown closes the controller's mailbox by dropping every handle the
//! system holds, then awaits the actor. Dropping the actor cancels its timers
//! and aborts loads still in flight.

use crate::config::{ClientConfig, ConfigError};
use crate::controller::{CatalogController, CatalogHandle, ViewState};
use crate::gateway::{HttpGateway, ProductApi};
use crate::mutation::{Confirmation, MutationOrchestrator};
use catalog_runtime::{notification_channel, NotificationFeed};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

pub struct CatalogSystem {
    pub handle: CatalogHandle,
    pub orchestrator: MutationOrchestrator,
    pub view: watch::Receiver<ViewState>,
    pub notifications: NotificationFeed,
    controller: JoinHandle<()>,
}

impl CatalogSystem {
    /// Starts the system against any [`ProductApi`]. Must be called inside a
    /// Tokio runtime.
    pub fn start(
        config: &ClientConfig,
        api: Arc<dyn ProductApi>,
        confirmation: Arc<dyn Confirmation>,
    ) -> Self {
        let (notifier, notifications) = notification_channel(config.notification_ttl);
        let (controller, handle, view) =
            CatalogController::new(config, Arc::clone(&api), notifier.clone());
        let orchestrator = MutationOrchestrator::new(api, handle.clone(), notifier, confirmation);

        let controller = tokio::spawn(controller.run());
        info!(base_url = %config.base_url, "Catalog system started");

        Self {
            handle,
            orchestrator,
            view,
            notifications,
            controller,
        }
    }

    /// Starts the system against the HTTP backend named in `config`.
    pub fn connect(
        config: &ClientConfig,
        confirmation: Arc<dyn Confirmation>,
    ) -> Result<Self, ConfigError> {
        let gateway = HttpGateway::new(config.endpoint()?);
        Ok(Self::start(config, Arc::new(gateway), confirmation))
    }

    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down catalog system");
        drop(self.handle);
        drop(self.orchestrator);
        self.controller.await
    }
}
