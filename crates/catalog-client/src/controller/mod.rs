//! # Query/Pagination State Controller
//!
//! The controller is an actor: a single Tokio task that exclusively owns the
//! query state, the current page of products and the highlight reconciler.
//! Everything else talks to it through a [`CatalogHandle`].
//!
//! One event loop multiplexes four sources:
//!
//! * the highlight clear-timer,
//! * completed loads (each runs in its own task inside a `JoinSet`),
//! * the debounced search text,
//! * commands from handles.
//!
//! Every load carries a [`Ticket`]. Only the outcome whose ticket is the
//! latest issued may touch the page; older outcomes are logged and dropped.
//! Each command issues at most one load, so a mutation that also resets the
//! page still produces a single request.

mod highlight;
mod state;
mod view;

pub use highlight::{ActiveHighlight, HighlightReconciler, RowHandle, RowRegistry, HIGHLIGHT_WINDOW};
pub use state::QueryState;
pub use view::{format_price, ViewState};

use crate::config::ClientConfig;
use crate::gateway::{GatewayError, ProductApi};
use crate::model::{PageResult, PageSize, Product, ProductId, Sort};
use catalog_runtime::{
    reply, Debounced, FrameworkError, Generation, Mailbox, Notifier, Response, Ticket,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Why a load was issued. Only used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    Initial,
    ParametersChanged,
    MutationCompleted,
    PageClamped,
    Requested,
}

impl fmt::Display for ReloadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ReloadReason::Initial => "initial",
            ReloadReason::ParametersChanged => "parameters changed",
            ReloadReason::MutationCompleted => "mutation completed",
            ReloadReason::PageClamped => "page clamped",
            ReloadReason::Requested => "requested",
        };
        f.write_str(reason)
    }
}

/// An explicit reload, optionally jumping to the first page and naming a
/// product to highlight once it is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub reason: ReloadReason,
    pub highlight: Option<ProductId>,
    pub first_page: bool,
}

impl ReloadRequest {
    pub fn refresh() -> Self {
        Self {
            reason: ReloadReason::Requested,
            highlight: None,
            first_page: false,
        }
    }

    pub fn after_mutation(highlight: Option<ProductId>, first_page: bool) -> Self {
        Self {
            reason: ReloadReason::MutationCompleted,
            highlight,
            first_page,
        }
    }
}

/// How the most recent load settled.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Applied,
    Failed(GatewayError),
}

#[derive(Debug)]
pub enum Command {
    SetSearchText {
        text: String,
        respond_to: Response<()>,
    },
    SetSize {
        size: PageSize,
        respond_to: Response<()>,
    },
    SetSort {
        sort: Sort,
        respond_to: Response<()>,
    },
    PrevPage {
        respond_to: Response<bool>,
    },
    NextPage {
        respond_to: Response<bool>,
    },
    /// Resolves once the load it issued (or a later one) has settled.
    Reload {
        request: ReloadRequest,
        respond_to: Response<LoadStatus>,
    },
    /// Resolves once no load is in flight.
    WaitIdle {
        respond_to: Response<LoadStatus>,
    },
    Snapshot {
        respond_to: Response<ViewState>,
    },
}

struct LoadOutcome {
    ticket: Ticket,
    reason: ReloadReason,
    result: Result<PageResult, GatewayError>,
}

enum Event {
    HighlightExpired(ProductId),
    Loaded(task::Id, LoadOutcome),
    LoadAborted(JoinError),
    SearchSettled(String),
    Command(Command),
    Closed,
}

pub struct CatalogController {
    receiver: mpsc::Receiver<Command>,
    api: Arc<dyn ProductApi>,
    notifier: Notifier,
    query: QueryState,
    search: Debounced<String>,
    generation: Generation,
    loads: JoinSet<LoadOutcome>,
    /// Ticket and reason of every load task still in the set.
    in_flight: HashMap<task::Id, (Ticket, ReloadReason)>,
    content: Vec<Product>,
    total: u64,
    loading: bool,
    rows: RowRegistry,
    highlight: HighlightReconciler,
    waiters: Vec<Response<LoadStatus>>,
    last_status: LoadStatus,
    view: watch::Sender<ViewState>,
}

impl CatalogController {
    /// Creates the controller, its handle and a receiver of published views.
    ///
    /// Nothing happens until [`CatalogController::run`] is spawned.
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn ProductApi>,
        notifier: Notifier,
    ) -> (Self, CatalogHandle, watch::Receiver<ViewState>) {
        let (mailbox, receiver) = Mailbox::channel(config.mailbox_capacity);
        let query = QueryState::new(config.default_size, config.default_sort);
        let (view, view_rx) = watch::channel(ViewState {
            size: query.size(),
            sort: query.sort(),
            ..ViewState::default()
        });

        let controller = Self {
            receiver,
            api,
            notifier,
            query,
            search: Debounced::new(String::new(), config.debounce),
            generation: Generation::new(),
            loads: JoinSet::new(),
            in_flight: HashMap::new(),
            content: Vec::new(),
            total: 0,
            loading: false,
            rows: RowRegistry::default(),
            highlight: HighlightReconciler::new(config.highlight_window),
            waiters: Vec::new(),
            last_status: LoadStatus::Applied,
            view,
        };
        (controller, CatalogHandle { mailbox }, view_rx)
    }

    /// Runs the event loop until every handle is dropped.
    ///
    /// Returning drops the `JoinSet`, which aborts loads still in flight, and
    /// both timers with it.
    pub async fn run(mut self) {
        info!("Controller started");
        self.issue_load(ReloadReason::Initial);

        loop {
            let event = tokio::select! {
                biased;
                id = self.highlight.expired() => Event::HighlightExpired(id),
                Some(joined) = self.loads.join_next_with_id(), if !self.loads.is_empty() => match joined {
                    Ok((id, outcome)) => Event::Loaded(id, outcome),
                    Err(e) => Event::LoadAborted(e),
                },
                text = self.search.settled() => Event::SearchSettled(text),
                command = self.receiver.recv() => match command {
                    Some(command) => Event::Command(command),
                    None => Event::Closed,
                },
            };

            match event {
                Event::HighlightExpired(id) => {
                    info!(%id, "Highlight cleared");
                    self.publish();
                }
                Event::Loaded(id, outcome) => {
                    self.in_flight.remove(&id);
                    self.commit(outcome);
                }
                Event::LoadAborted(e) => self.on_aborted(e),
                Event::SearchSettled(text) => {
                    debug!(search = %text, "Search settled");
                    if self.query.apply_debounced_search(text) {
                        self.issue_load(ReloadReason::ParametersChanged);
                    }
                }
                Event::Command(command) => self.handle_command(command),
                Event::Closed => break,
            }
        }

        info!(in_flight = self.loads.len(), "Shutdown");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetSearchText { text, respond_to } => {
                self.query.set_search_text(text.clone());
                self.search.push(text);
                self.publish();
                reply(respond_to, ());
            }
            Command::SetSize { size, respond_to } => {
                if self.query.set_size(size) {
                    self.issue_load(ReloadReason::ParametersChanged);
                }
                reply(respond_to, ());
            }
            Command::SetSort { sort, respond_to } => {
                if self.query.set_sort(sort) {
                    self.issue_load(ReloadReason::ParametersChanged);
                }
                reply(respond_to, ());
            }
            Command::PrevPage { respond_to } => {
                let moved = self.query.prev();
                if moved {
                    self.issue_load(ReloadReason::ParametersChanged);
                }
                reply(respond_to, moved);
            }
            Command::NextPage { respond_to } => {
                let moved = self.query.next();
                if moved {
                    self.issue_load(ReloadReason::ParametersChanged);
                }
                reply(respond_to, moved);
            }
            Command::Reload {
                request,
                respond_to,
            } => {
                if let Some(id) = request.highlight {
                    self.highlight.request(id);
                }
                if request.first_page {
                    self.query.first_page();
                }
                self.issue_load(request.reason);
                self.waiters.push(respond_to);
            }
            Command::WaitIdle { respond_to } => {
                if self.generation.in_flight() {
                    self.waiters.push(respond_to);
                } else {
                    reply(respond_to, self.last_status.clone());
                }
            }
            Command::Snapshot { respond_to } => reply(respond_to, self.view_state()),
        }
    }

    fn issue_load(&mut self, reason: ReloadReason) {
        let ticket = self.generation.issue();
        let params = self.query.params();
        info!(
            %ticket,
            %reason,
            page = params.page,
            size = %params.size,
            sort = %params.sort,
            search = %params.search_text,
            "Load issued"
        );

        self.loading = true;
        let api = Arc::clone(&self.api);
        let task = self.loads.spawn(async move {
            let result = api.list_products(&params).await;
            LoadOutcome {
                ticket,
                reason,
                result,
            }
        });
        self.in_flight.insert(task.id(), (ticket, reason));
        self.publish();
    }

    fn commit(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            ticket,
            reason,
            result,
        } = outcome;
        if !self.generation.settle(ticket) {
            debug!(%ticket, %reason, "Discarded stale load");
            return;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                let last_page_index = page.last_page_index();
                self.content = page.content;
                self.total = page.total_elements;
                self.rows = RowRegistry::render(&self.content);
                self.last_status = LoadStatus::Applied;

                if self.query.commit_last_page(last_page_index) {
                    // Waiters stay queued until the follow-up settles.
                    info!(page = self.query.page(), "Page out of range, clamped");
                    self.highlight.interrupt();
                    self.issue_load(ReloadReason::PageClamped);
                    return;
                }

                info!(%ticket, rows = self.rows.len(), total = self.total, "Load applied");
                if let Some(active) = self.highlight.reconcile(&self.rows) {
                    info!(id = %active.id, row = active.row.index(), "Highlight activated");
                }
            }
            Err(error) => {
                warn!(%ticket, %reason, error = %error, "Load failed");
                self.notifier.error("Failed to load products");
                self.last_status = LoadStatus::Failed(error);
            }
        }

        self.resolve_waiters();
        self.publish();
    }

    fn on_aborted(&mut self, error: JoinError) {
        warn!(error = %error, "Load task aborted");
        match self.in_flight.remove(&error.id()) {
            Some((ticket, reason)) => self.commit(LoadOutcome {
                ticket,
                reason,
                result: Err(GatewayError::network(error)),
            }),
            None => debug!("Aborted task was not a tracked load"),
        }
    }

    fn resolve_waiters(&mut self) {
        for waiter in self.waiters.drain(..) {
            reply(waiter, self.last_status.clone());
        }
    }

    fn view_state(&self) -> ViewState {
        ViewState {
            page: self.query.page(),
            size: self.query.size(),
            sort: self.query.sort(),
            search_text: self.query.search_text().to_string(),
            content: self.content.clone(),
            total: self.total,
            last_page_index: self.query.last_page_index(),
            loading: self.loading,
            highlight: self.highlight.active().cloned(),
        }
    }

    fn publish(&self) {
        self.view.send_replace(self.view_state());
    }
}

/// Cloneable client for a running [`CatalogController`].
#[derive(Clone)]
pub struct CatalogHandle {
    mailbox: Mailbox<Command>,
}

impl CatalogHandle {
    pub fn new(mailbox: Mailbox<Command>) -> Self {
        Self { mailbox }
    }

    /// Updates the search box. The query follows once typing pauses.
    pub async fn set_search_text(&self, text: impl Into<String>) -> Result<(), FrameworkError> {
        let text = text.into();
        self.mailbox
            .ask(|respond_to| Command::SetSearchText { text, respond_to })
            .await
    }

    pub async fn set_size(&self, size: PageSize) -> Result<(), FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::SetSize { size, respond_to })
            .await
    }

    pub async fn set_sort(&self, sort: Sort) -> Result<(), FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::SetSort { sort, respond_to })
            .await
    }

    /// Returns `false` when already on the first page.
    pub async fn prev_page(&self) -> Result<bool, FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::PrevPage { respond_to })
            .await
    }

    /// Returns `false` when already on the last page.
    pub async fn next_page(&self) -> Result<bool, FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::NextPage { respond_to })
            .await
    }

    pub async fn reload(&self, request: ReloadRequest) -> Result<LoadStatus, FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::Reload {
                request,
                respond_to,
            })
            .await
    }

    pub async fn wait_idle(&self) -> Result<LoadStatus, FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::WaitIdle { respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<ViewState, FrameworkError> {
        self.mailbox
            .ask(|respond_to| Command::Snapshot { respond_to })
            .await
    }
}
