use async_trait::async_trait;
use catalog_client::gateway::mock::{page_of, MockGateway};
use catalog_client::gateway::{Created, GatewayError, ProductApi};
use catalog_client::model::{
    PageResult, PageSize, ProductDraft, ProductId, QueryParameters, Sort, SortDirection,
    SortField,
};
use catalog_client::mutation::AutoConfirm;
use catalog_client::{CatalogSystem, ClientConfig, LoadStatus, ReloadRequest, ViewState};
use catalog_runtime::Level;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn start(mock: &Arc<MockGateway>) -> CatalogSystem {
    CatalogSystem::start(
        &ClientConfig::default(),
        mock.clone(),
        Arc::new(AutoConfirm(true)),
    )
}

/// Lets every task run until the paused runtime goes idle.
async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

fn ids(view: &ViewState) -> Vec<String> {
    view.content.iter().map(|p| p.id.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_uses_defaults() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[3, 2, 1], 1));

    let system = start(&mock);
    assert_eq!(system.handle.wait_idle().await, Ok(LoadStatus::Applied));

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(ids(&view), ["3", "2", "1"]);
    assert_eq!(view.total, 3);
    assert!(!view.loading);

    let calls = mock.list_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].page, 0);
    assert_eq!(calls[0].size, PageSize::Ten);
    assert_eq!(calls[0].sort.to_string(), "id,desc");
    assert_eq!(calls[0].search_text, "");

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_issues_one_search() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[3, 2, 1], 1));
    mock.expect_list().return_ok(page_of(&[2], 1));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    for text in ["a", "ab", "abc"] {
        system.handle.set_search_text(text).await.unwrap();
        sleep(Duration::from_millis(100)).await;
    }
    // 100ms after the last keystroke; quiet period is 300ms.
    sleep(Duration::from_millis(198)).await;
    assert_eq!(mock.list_calls().len(), 1);

    sleep(Duration::from_millis(5)).await;
    assert_eq!(system.handle.wait_idle().await, Ok(LoadStatus::Applied));

    let calls = mock.list_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].search_text, "abc");
    assert_eq!(calls[1].page, 0);
    assert_eq!(ids(&system.handle.snapshot().await.unwrap()), ["2"]);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_search_text_shows_immediately_but_queries_later() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));
    mock.expect_list().return_ok(page_of(&[1], 1));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    system.handle.set_search_text("lamp").await.unwrap();
    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(view.search_text, "lamp");
    assert_eq!(mock.list_calls().len(), 1);

    // Typing back to the settled value cancels the pending query.
    system.handle.set_search_text("").await.unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(mock.list_calls().len(), 1);

    system.handle.set_search_text("desk").await.unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(mock.list_calls()[1].search_text, "desk");

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_size_and_sort_reset_page() {
    let mock = Arc::new(MockGateway::new());
    for _ in 0..4 {
        mock.expect_list().return_ok(page_of(&[1, 2], 3));
    }

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    assert!(system.handle.next_page().await.unwrap());
    system.handle.wait_idle().await.unwrap();
    assert_eq!(system.handle.snapshot().await.unwrap().page, 1);

    system.handle.set_size(PageSize::Twenty).await.unwrap();
    system.handle.wait_idle().await.unwrap();
    // Same size again: nothing to do.
    system.handle.set_size(PageSize::Twenty).await.unwrap();

    let by_name = Sort::new(SortField::Name, SortDirection::Asc);
    system.handle.set_sort(by_name).await.unwrap();
    system.handle.wait_idle().await.unwrap();

    let calls = mock.list_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!((calls[1].page, calls[1].size), (1, PageSize::Ten));
    assert_eq!((calls[2].page, calls[2].size), (0, PageSize::Twenty));
    assert_eq!(calls[3].page, 0);
    assert_eq!(calls[3].sort.to_string(), "name,asc");

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_page_navigation_stops_at_bounds() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1, 2], 2));
    mock.expect_list().return_ok(page_of(&[3], 2));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    assert!(!system.handle.prev_page().await.unwrap());
    assert!(system.handle.next_page().await.unwrap());
    system.handle.wait_idle().await.unwrap();
    assert!(!system.handle.next_page().await.unwrap());

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(view.page_label(), "Page 2 of 2");
    assert!(view.can_go_prev());
    assert!(!view.can_go_next());
    assert_eq!(mock.list_calls().len(), 2);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_late_response_for_old_query_is_discarded() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));
    let first = mock.expect_list().deferred();
    let second = mock.expect_list().deferred();

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    system.handle.set_size(PageSize::Five).await.unwrap();
    settle().await;
    system.handle.set_size(PageSize::Fifty).await.unwrap();
    settle().await;
    assert_eq!(mock.list_calls().len(), 3);

    second.send(Ok(page_of(&[50], 1))).unwrap();
    settle().await;
    first.send(Ok(page_of(&[5], 1))).unwrap();
    settle().await;

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(ids(&view), ["50"]);
    assert_eq!(view.size, PageSize::Fifty);
    assert!(!view.loading);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_older_response_arriving_first_does_not_settle_loading() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));
    let first = mock.expect_list().deferred();
    let second = mock.expect_list().deferred();

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    system.handle.set_size(PageSize::Five).await.unwrap();
    settle().await;
    system.handle.set_size(PageSize::Fifty).await.unwrap();
    settle().await;

    first.send(Ok(page_of(&[5], 1))).unwrap();
    settle().await;
    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(ids(&view), ["1"]);
    assert!(view.loading);

    second.send(Ok(page_of(&[50], 1))).unwrap();
    assert_eq!(system.handle.wait_idle().await, Ok(LoadStatus::Applied));
    assert_eq!(ids(&system.handle.snapshot().await.unwrap()), ["50"]);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_keeps_content_and_notifies() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[3, 2, 1], 1));
    mock.expect_list().return_err(GatewayError::Network {
        status: Some(500),
        message: "HTTP 500".to_string(),
    });

    let mut system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    let status = system.handle.reload(ReloadRequest::refresh()).await.unwrap();
    assert!(matches!(status, LoadStatus::Failed(ref e) if e.status() == Some(500)));

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(ids(&view), ["3", "2", "1"]);
    assert!(!view.loading);

    let notifications = system.notifications.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, Level::Error);
    assert_eq!(notifications[0].message, "Failed to load products");
    assert_eq!(notifications[0].ttl, Duration::from_millis(2500));

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_page_is_clamped_with_one_follow_up() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1, 2], 2));
    mock.expect_list().return_ok(page_of(&[3], 2));
    // The only row on page 2 is gone: one page left.
    let mut shrunk = page_of(&[], 1);
    shrunk.total_elements = 2;
    mock.expect_list().return_ok(shrunk);
    mock.expect_list().return_ok(page_of(&[1, 2], 1));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();
    system.handle.next_page().await.unwrap();
    system.handle.wait_idle().await.unwrap();

    let status = system.handle.reload(ReloadRequest::refresh()).await.unwrap();
    assert_eq!(status, LoadStatus::Applied);

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(view.page, 0);
    assert_eq!(ids(&view), ["1", "2"]);

    let pages: Vec<_> = mock.list_calls().iter().map(|p| p.page).collect();
    assert_eq!(pages, [0, 1, 1, 0]);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_view_updates_are_published() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[7], 1));

    let mut system = start(&mock);
    system
        .view
        .wait_for(|view| !view.loading && view.total == 1)
        .await
        .unwrap();
    assert_eq!(system.view.borrow().item_count_label(), "1 item");

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_loads_in_flight() {
    let mock = Arc::new(MockGateway::new());
    let hanging = mock.expect_list().deferred();

    let system = start(&mock);
    settle().await;
    assert_eq!(mock.list_calls().len(), 1);

    system.shutdown().await.unwrap();
    settle().await;
    assert!(hanging.send(Ok(page_of(&[1], 1))).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_reload_highlight_for_missing_row_is_dropped() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));
    mock.expect_list().return_ok(page_of(&[1], 1));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();

    let request = ReloadRequest::after_mutation(Some(ProductId::new("99")), false);
    system.handle.reload(request).await.unwrap();
    assert!(system.handle.snapshot().await.unwrap().highlight.is_none());

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_clamping_reload_removes_highlight_until_follow_up_lands() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1, 2], 2));
    mock.expect_list().return_ok(page_of(&[3], 2));
    mock.expect_list().return_ok(page_of(&[3], 2));
    let mut shrunk = page_of(&[], 1);
    shrunk.total_elements = 2;
    mock.expect_list().return_ok(shrunk);
    let follow_up = mock.expect_list().deferred();

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();
    system.handle.next_page().await.unwrap();
    system.handle.wait_idle().await.unwrap();

    let request = ReloadRequest::after_mutation(Some(ProductId::new("3")), false);
    system.handle.reload(request).await.unwrap();
    let view = system.handle.snapshot().await.unwrap();
    assert!(view.is_highlighted(&ProductId::new("3")));

    let reload = {
        let handle = system.handle.clone();
        tokio::spawn(async move { handle.reload(ReloadRequest::refresh()).await })
    };
    settle().await;

    let view = system.handle.snapshot().await.unwrap();
    assert_eq!(view.page, 0);
    assert!(view.loading);
    assert!(view.content.is_empty());
    assert!(view.highlight.is_none());

    follow_up.send(Ok(page_of(&[3, 1], 1))).unwrap();
    assert_eq!(reload.await.unwrap(), Ok(LoadStatus::Applied));

    // Still pending, so the follow-up page picks the target up again.
    let active = system.handle.snapshot().await.unwrap().highlight.unwrap();
    assert_eq!(active.id, ProductId::new("3"));
    assert_eq!(active.row.index(), 0);

    system.shutdown().await.unwrap();
    mock.verify();
}

/// Delegates to the mock, except that listings of one page size panic.
struct PanicsOnSize {
    inner: Arc<MockGateway>,
    size: PageSize,
}

#[async_trait]
impl ProductApi for PanicsOnSize {
    async fn list_products(&self, params: &QueryParameters) -> Result<PageResult, GatewayError> {
        if params.size == self.size {
            panic!("listing with size {} blew up", params.size);
        }
        self.inner.list_products(params).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Created, GatewayError> {
        self.inner.create_product(draft).await
    }

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<(), GatewayError> {
        self.inner.update_product(id, draft).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        self.inner.delete_product(id).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_panicking_latest_load_settles_while_older_load_hangs() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));
    let older = mock.expect_list().deferred();

    let api = Arc::new(PanicsOnSize {
        inner: mock.clone(),
        size: PageSize::Fifty,
    });
    let mut system = CatalogSystem::start(
        &ClientConfig::default(),
        api,
        Arc::new(AutoConfirm(true)),
    );
    system.handle.wait_idle().await.unwrap();

    system.handle.set_size(PageSize::Five).await.unwrap();
    settle().await;
    system.handle.set_size(PageSize::Fifty).await.unwrap();

    let status = system.handle.wait_idle().await.unwrap();
    assert!(matches!(status, LoadStatus::Failed(GatewayError::Network { .. })));
    let view = system.handle.snapshot().await.unwrap();
    assert!(!view.loading);
    assert_eq!(ids(&view), ["1"]);

    let notifications = system.notifications.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Failed to load products");

    // The older load finishing late changes nothing.
    older.send(Ok(page_of(&[5], 1))).unwrap();
    settle().await;
    assert_eq!(ids(&system.handle.snapshot().await.unwrap()), ["1"]);

    system.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_pending_search_never_loads_after_shutdown() {
    let mock = Arc::new(MockGateway::new());
    mock.expect_list().return_ok(page_of(&[1], 1));

    let system = start(&mock);
    system.handle.wait_idle().await.unwrap();
    system.handle.set_search_text("x").await.unwrap();
    system.shutdown().await.unwrap();

    sleep(Duration::from_secs(5)).await;
    assert_eq!(mock.list_calls().len(), 1);
    mock.verify();
}
