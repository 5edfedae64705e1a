//! Demo: browse, search and create against a running catalog backend.
//!
//! ```bash
//! CATALOG_API_BASE=http://localhost:8080/api/products RUST_LOG=info cargo run
//! ```

use catalog_client::controller::format_price;
use catalog_client::model::ProductDraft;
use catalog_client::mutation::AutoConfirm;
use catalog_client::{CatalogSystem, ClientConfig, ViewState};
use catalog_runtime::tracing::setup_tracing;
use std::sync::Arc;
use tracing::{error, info};

fn print_page(heading: &str, view: &ViewState) {
    println!("== {heading}: {} / {}", view.item_count_label(), view.page_label());
    for product in &view.content {
        let marker = if view.is_highlighted(&product.id) { "*" } else { " " };
        println!(
            "{marker} #{:<6} {:<40} {:>14}",
            product.id,
            product.name,
            format_price(product.price)
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    // The demo never deletes; refuse any prompt.
    let mut system =
        CatalogSystem::connect(&config, Arc::new(AutoConfirm(false))).map_err(|e| e.to_string())?;

    system.handle.wait_idle().await.map_err(|e| e.to_string())?;
    let view = system.handle.snapshot().await.map_err(|e| e.to_string())?;
    print_page("First page", &view);

    system
        .handle
        .set_search_text("lamp")
        .await
        .map_err(|e| e.to_string())?;
    tokio::time::sleep(config.debounce * 2).await;
    system.handle.wait_idle().await.map_err(|e| e.to_string())?;
    let view = system.handle.snapshot().await.map_err(|e| e.to_string())?;
    print_page("Search \"lamp\"", &view);

    system.handle.set_search_text("").await.map_err(|e| e.to_string())?;
    tokio::time::sleep(config.debounce * 2).await;

    match system
        .orchestrator
        .submit(None, ProductDraft::new("Demo Desk Lamp", 24.9))
        .await
    {
        Ok(id) => {
            info!(id = ?id, "Product created");
            let view = system.handle.snapshot().await.map_err(|e| e.to_string())?;
            print_page("After create", &view);
        }
        Err(e) => error!(error = %e, "Create failed"),
    }

    for notification in system.notifications.drain() {
        println!("[{:?}] {}", notification.level, notification.message);
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}
