//! Query parameters for the paginated product listing.

use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Page sizes offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize::Five, PageSize::Ten, PageSize::Twenty, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = QueryError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(QueryError::UnsupportedPageSize(value))
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Price,
}

impl SortField {
    fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort key sent as `field,direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Newest first.
    pub const NEWEST: Sort = Sort::new(SortField::Id, SortDirection::Desc);

    /// Every option offered in the toolbar, in display order.
    pub const OPTIONS: [Sort; 6] = [
        Sort::new(SortField::Id, SortDirection::Desc),
        Sort::new(SortField::Id, SortDirection::Asc),
        Sort::new(SortField::Name, SortDirection::Asc),
        Sort::new(SortField::Name, SortDirection::Desc),
        Sort::new(SortField::Price, SortDirection::Asc),
        Sort::new(SortField::Price, SortDirection::Desc),
    ];

    /// Human-readable label for the sort selector.
    pub fn label(self) -> &'static str {
        use SortDirection::*;
        use SortField::*;
        match (self.field, self.direction) {
            (Id, Desc) => "ID ↓ (Newest)",
            (Id, Asc) => "ID ↑ (Oldest)",
            (Name, Asc) => "Name A→Z",
            (Name, Desc) => "Name Z→A",
            (Price, Asc) => "Price ↑ (Lowest)",
            (Price, Desc) => "Price ↓ (Highest)",
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Sort::NEWEST
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QueryError::InvalidSort(s.to_string());
        let (field, direction) = s.split_once(',').ok_or_else(invalid)?;
        let field = match field.trim() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "price" => SortField::Price,
            _ => return Err(invalid()),
        };
        let direction = match direction.trim() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(invalid()),
        };
        Ok(Sort::new(field, direction))
    }
}

/// Errors raised while interpreting user-supplied query settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unsupported page size: {0}")]
    UnsupportedPageSize(u32),
    #[error("Invalid sort key: {0:?}")]
    InvalidSort(String),
}

/// Everything needed to request one page from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParameters {
    pub page: u32,
    pub size: PageSize,
    pub sort: Sort,
    pub search_text: String,
}

impl QueryParameters {
    /// Whether this query goes to the search endpoint.
    pub fn is_search(&self) -> bool {
        !self.search_text.is_empty()
    }

    /// Query-string pairs, omitting empty values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.to_string()),
        ];
        if self.is_search() {
            pairs.push(("q", self.search_text.clone()));
        }
        pairs
    }
}
