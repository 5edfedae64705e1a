//! # Highlight Reconciler
//!
//! After a mutation the affected product should pulse briefly once it shows
//! up in the reloaded page. The orchestrator only names the id; matching it to
//! a rendered row happens here, against a [`RowRegistry`] rebuilt from every
//! committed page.
//!
//! Lifecycle of a target:
//!
//! 1. [`HighlightReconciler::request`] stores it as pending.
//! 2. [`HighlightReconciler::reconcile`] runs after each committed reload. A
//!    found row becomes active and its clear-timer starts; a missing row
//!    drops the target.
//! 3. [`HighlightReconciler::expired`] resolves when the window elapses and
//!    clears both the mark and the pending target.
//!
//! New content arriving before expiry cancels the running timer and removes
//! the mark, so a timer never clears a row it did not set.

use crate::model::{Product, ProductId};
use catalog_runtime::PendingTimer;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// How long a highlighted row stays marked.
pub const HIGHLIGHT_WINDOW: Duration = Duration::from_millis(1800);

/// Stable reference to a rendered row: its position on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(usize);

impl RowHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Maps product ids to the rows they were rendered into.
#[derive(Debug, Clone, Default)]
pub struct RowRegistry {
    rows: HashMap<ProductId, RowHandle>,
}

impl RowRegistry {
    pub fn render(content: &[Product]) -> Self {
        let rows = content
            .iter()
            .enumerate()
            .map(|(index, product)| (product.id.clone(), RowHandle(index)))
            .collect();
        Self { rows }
    }

    pub fn get(&self, id: &ProductId) -> Option<RowHandle> {
        self.rows.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row currently showing the highlight pulse. The renderer scrolls it into
/// view when it first appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveHighlight {
    pub id: ProductId,
    pub row: RowHandle,
}

#[derive(Debug)]
pub struct HighlightReconciler {
    pending: Option<ProductId>,
    active: Option<ActiveHighlight>,
    clear: PendingTimer<ProductId>,
    window: Duration,
}

impl Default for HighlightReconciler {
    fn default() -> Self {
        Self::new(HIGHLIGHT_WINDOW)
    }
}

impl HighlightReconciler {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            active: None,
            clear: PendingTimer::new(),
            window,
        }
    }

    /// Names the product to highlight once it appears in a reloaded page.
    pub fn request(&mut self, id: ProductId) {
        debug!(%id, "Highlight requested");
        self.pending = Some(id);
    }

    pub fn pending(&self) -> Option<&ProductId> {
        self.pending.as_ref()
    }

    pub fn active(&self) -> Option<&ActiveHighlight> {
        self.active.as_ref()
    }

    /// Matches the pending target against freshly rendered rows.
    ///
    /// Returns the newly activated highlight, if any.
    pub fn reconcile(&mut self, rows: &RowRegistry) -> Option<ActiveHighlight> {
        self.interrupt();

        let target = self.pending.clone()?;
        match rows.get(&target) {
            Some(row) => {
                let active = ActiveHighlight { id: target.clone(), row };
                self.clear.arm(target, self.window);
                self.active = Some(active.clone());
                Some(active)
            }
            None => {
                debug!(id = %target, "Highlight target not on page, dropped");
                self.pending = None;
                None
            }
        }
    }

    /// Removes the mark from rows that are being replaced. The target stays
    /// pending so the next committed page can match it again.
    pub fn interrupt(&mut self) {
        if let Some(stale) = self.clear.cancel() {
            debug!(id = %stale, "Highlight interrupted by new content");
        }
        self.active = None;
    }

    /// Resolves when the active pulse's window elapses, clearing it.
    ///
    /// Never resolves while nothing is active. Cancel-safe.
    pub async fn expired(&mut self) -> ProductId {
        let id = self.clear.fired().await;
        self.active = None;
        if self.pending.as_ref() == Some(&id) {
            self.pending = None;
        }
        id
    }
}
