//! Query/pagination state and its transition rules.
//!
//! Every mutator returns `true` when the query parameters actually changed,
//! which is the controller's cue to issue a load. Unchanged settings never
//! cause a reload.

use crate::model::{PageSize, QueryParameters, Sort};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    size: PageSize,
    sort: Sort,
    /// What the search box shows right now.
    search_text: String,
    /// The settled mirror of `search_text` that queries are built from.
    debounced_search: String,
    last_page_index: u32,
}

impl QueryState {
    pub fn new(size: PageSize, sort: Sort) -> Self {
        Self {
            page: 0,
            size,
            sort,
            search_text: String::new(),
            debounced_search: String::new(),
            last_page_index: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn debounced_search(&self) -> &str {
        &self.debounced_search
    }

    pub fn last_page_index(&self) -> u32 {
        self.last_page_index
    }

    pub fn params(&self) -> QueryParameters {
        QueryParameters {
            page: self.page,
            size: self.size,
            sort: self.sort,
            search_text: self.debounced_search.clone(),
        }
    }

    /// Updates the visible search text only; queries wait for the debounce.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn apply_debounced_search(&mut self, text: String) -> bool {
        if text == self.debounced_search {
            return false;
        }
        self.debounced_search = text;
        self.page = 0;
        true
    }

    pub fn set_size(&mut self, size: PageSize) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        self.page = 0;
        true
    }

    pub fn set_sort(&mut self, sort: Sort) -> bool {
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        self.page = 0;
        true
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.last_page_index
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Jumps back to the first page (used after a create).
    pub fn first_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page = 0;
        true
    }

    /// Records the page count of a committed result and pulls the current page
    /// back into range. Returns `true` if the page had to move.
    pub fn commit_last_page(&mut self, last_page_index: u32) -> bool {
        self.last_page_index = last_page_index;
        if self.page <= last_page_index {
            return false;
        }
        self.page = last_page_index;
        true
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSize::default(), Sort::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SortDirection, SortField};

    fn on_page(page: u32, last: u32) -> QueryState {
        let mut state = QueryState::default();
        state.commit_last_page(last);
        for _ in 0..page {
            assert!(state.next());
        }
        state
    }

    #[test]
    fn test_size_and_sort_changes_reset_page() {
        let mut state = on_page(3, 5);

        assert!(state.set_size(PageSize::Fifty));
        assert_eq!(state.page(), 0);

        let mut state = on_page(2, 5);
        assert!(state.set_sort(Sort::new(SortField::Price, SortDirection::Asc)));
        assert_eq!(state.page(), 0);
    }

    #[test]
    fn test_same_setting_is_not_a_change() {
        let mut state = on_page(2, 5);
        assert!(!state.set_size(PageSize::Ten));
        assert!(!state.set_sort(Sort::NEWEST));
        assert!(!state.apply_debounced_search(String::new()));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_search_text_waits_for_debounce() {
        let mut state = on_page(1, 5);
        state.set_search_text("mu");

        assert_eq!(state.search_text(), "mu");
        assert_eq!(state.params().search_text, "");
        assert_eq!(state.page(), 1);

        assert!(state.apply_debounced_search("mug".into()));
        assert_eq!(state.params().search_text, "mug");
        assert_eq!(state.page(), 0);
    }

    #[test]
    fn test_prev_and_next_are_noops_at_boundaries() {
        let mut state = on_page(0, 2);
        let before = state.clone();
        assert!(!state.prev());
        assert_eq!(state, before);

        let mut state = on_page(2, 2);
        let before = state.clone();
        assert!(!state.next());
        assert_eq!(state, before);
    }

    #[test]
    fn test_commit_clamps_page_into_range() {
        let mut state = on_page(4, 4);
        assert!(state.commit_last_page(2));
        assert_eq!(state.page(), 2);
        assert!(!state.commit_last_page(2));
    }
}
