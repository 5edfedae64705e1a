//! # Mock Gateway
//!
//! A scripted, in-memory [`ProductApi`] for testing the controller and the
//! mutation orchestrator without a backend.
//!
//! Each operation has its own queue of expectations, consumed in order. A
//! reply is either ready immediately or **deferred**: the test keeps the
//! sending half and decides when (and in which order) overlapping requests
//! resolve, which is how stale-response races are reproduced.
//!
//! ```rust,ignore
//! let mock = Arc::new(MockGateway::new());
//! mock.expect_list().return_ok(page_of(&[3, 2, 1], 1));
//! let slow = mock.expect_list().deferred();
//!
//! // ... drive the controller ...
//!
//! slow.send(Ok(page_of(&[9], 1))).unwrap();
//! mock.verify(); // every expectation was consumed
//! ```
//!
//! Calls with no matching expectation are recorded and answered with a
//! [`GatewayError::Network`] so the code under test exercises its failure path
//! instead of panicking inside a spawned task.

use super::{Created, GatewayError, ProductApi};
use crate::model::{PageResult, ProductDraft, ProductId, QueryParameters};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(QueryParameters),
    Create(ProductDraft),
    Update(ProductId, ProductDraft),
    Delete(ProductId),
}

enum Reply<T> {
    Ready(Result<T, GatewayError>),
    Deferred(oneshot::Receiver<Result<T, GatewayError>>),
}

type Queue<T> = Arc<Mutex<VecDeque<Reply<T>>>>;

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T> {
    queue: Queue<T>,
}

impl<T> ExpectationBuilder<T> {
    pub fn return_ok(self, value: T) {
        self.push(Reply::Ready(Ok(value)));
    }

    pub fn return_err(self, error: GatewayError) {
        self.push(Reply::Ready(Err(error)));
    }

    /// Leaves the call hanging until the test sends its result.
    pub fn deferred(self) -> oneshot::Sender<Result<T, GatewayError>> {
        let (sender, receiver) = oneshot::channel();
        self.push(Reply::Deferred(receiver));
        sender
    }

    fn push(self, reply: Reply<T>) {
        lock(&self.queue).push_back(reply);
    }
}

/// Scripted [`ProductApi`] with call recording.
#[derive(Default)]
pub struct MockGateway {
    list: Queue<PageResult>,
    create: Queue<Created>,
    update: Queue<()>,
    delete: Queue<()>,
    calls: Mutex<Vec<Call>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_list(&self) -> ExpectationBuilder<PageResult> {
        ExpectationBuilder {
            queue: self.list.clone(),
        }
    }

    pub fn expect_create(&self) -> ExpectationBuilder<Created> {
        ExpectationBuilder {
            queue: self.create.clone(),
        }
    }

    pub fn expect_update(&self) -> ExpectationBuilder<()> {
        ExpectationBuilder {
            queue: self.update.clone(),
        }
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<()> {
        ExpectationBuilder {
            queue: self.delete.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Parameters of every listing request received so far.
    pub fn list_calls(&self) -> Vec<QueryParameters> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::List(params) => Some(params),
                _ => None,
            })
            .collect()
    }

    /// Panics if any scripted reply was never consumed.
    pub fn verify(&self) {
        let pending = [
            ("list", lock(&self.list).len()),
            ("create", lock(&self.create).len()),
            ("update", lock(&self.update).len()),
            ("delete", lock(&self.delete).len()),
        ];
        for (operation, remaining) in pending {
            assert_eq!(remaining, 0, "{remaining} unmet {operation} expectation(s)");
        }
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    async fn answer<T>(queue: &Queue<T>, operation: &str) -> Result<T, GatewayError> {
        let next = lock(queue).pop_front();
        match next {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(receiver)) => receiver.await.unwrap_or_else(|_| {
                Err(GatewayError::network(format!("deferred {operation} reply dropped")))
            }),
            None => Err(GatewayError::network(format!("unexpected {operation} call"))),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A panicking test thread must not hide the original failure.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ProductApi for MockGateway {
    async fn list_products(&self, params: &QueryParameters) -> Result<PageResult, GatewayError> {
        self.record(Call::List(params.clone()));
        Self::answer(&self.list, "list").await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Created, GatewayError> {
        self.record(Call::Create(draft.clone()));
        Self::answer(&self.create, "create").await
    }

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<(), GatewayError> {
        self.record(Call::Update(id.clone(), draft.clone()));
        Self::answer(&self.update, "update").await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        self.record(Call::Delete(id.clone()));
        Self::answer(&self.delete, "delete").await
    }
}

/// Builds a page whose rows carry the given ids (in order).
pub fn page_of(ids: &[u64], total_pages: u32) -> PageResult {
    let content: Vec<_> = ids
        .iter()
        .map(|id| crate::model::Product::new(*id, format!("Product {id}"), *id as f64))
        .collect();
    PageResult {
        total_elements: content.len() as u64,
        content,
        total_pages,
        number: 0,
    }
}
