//! Decoded page of products plus the error map the backend returns on 400.

use super::product::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One page of products as returned by the backend's paginated endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(default)]
    pub content: Vec<Product>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
}

impl PageResult {
    /// Index of the last page. A reported page count of zero counts as one
    /// (empty) page.
    pub fn last_page_index(&self) -> u32 {
        self.total_pages.max(1) - 1
    }
}

/// Validation messages keyed by field name, e.g. `name -> "Name is mandatory"`.
pub type FieldErrors = BTreeMap<String, String>;
