//! Snapshot of everything a renderer needs, published after every change.

use super::highlight::ActiveHighlight;
use crate::model::{PageSize, Product, ProductId, Sort};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub page: u32,
    pub size: PageSize,
    pub sort: Sort,
    /// Raw search box contents (not yet necessarily queried).
    pub search_text: String,
    pub content: Vec<Product>,
    pub total: u64,
    pub last_page_index: u32,
    pub loading: bool,
    pub highlight: Option<ActiveHighlight>,
}

impl ViewState {
    /// `"1 item"`, `"12 items"`.
    pub fn item_count_label(&self) -> String {
        let plural = if self.total == 1 { "" } else { "s" };
        format!("{} item{plural}", self.total)
    }

    /// `"Page 1 of 3"`.
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.last_page_index + 1)
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.last_page_index
    }

    pub fn is_highlighted(&self, id: &ProductId) -> bool {
        self.highlight.as_ref().is_some_and(|active| &active.id == id)
    }
}

/// Formats a price the Austrian way, e.g. `€ 1.234,50`.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{sign}€ {grouped},{:02}", cents % 100)
}
