//! Account search, sort and pagination types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page size used when a caller asks for a page size below 1
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Recognized sort keys for account listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "balance" => Ok(SortKey::Balance),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// Normalized page request.
///
/// Page numbers below 1 become 1, page sizes below 1 become
/// [`DEFAULT_PAGE_SIZE`]. No upper bound is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        let page_number = if page_number < 1 {
            1
        } else {
            u32::try_from(page_number).unwrap_or(u32::MAX)
        };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            u32::try_from(page_size).unwrap_or(u32::MAX)
        };

        Self {
            page_number,
            page_size,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of matching items preceding this page
    pub fn skip(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_number - 1)
    }

    pub fn take(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, i64::from(DEFAULT_PAGE_SIZE))
    }
}

/// Fully validated account query handed to the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountQuery {
    /// Case-sensitive substring of the holder name
    pub name_filter: Option<String>,
    pub sort: Option<SortKey>,
    pub descending: bool,
    pub page: PageRequest,
}

/// Pagination metadata for one page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub total_item_count: u64,
    pub total_page_count: u64,
}

impl PaginationMetadata {
    pub fn new(page: &PageRequest, total_item_count: u64) -> Self {
        let page_size = u64::from(page.page_size());
        Self {
            current_page: page.page_number(),
            page_size: page.page_size(),
            total_item_count,
            total_page_count: total_item_count.div_ceil(page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!("balance".parse::<SortKey>(), Ok(SortKey::Balance));
        assert_eq!(
            "Name".parse::<SortKey>(),
            Err(UnknownSortKey("Name".to_string()))
        );
        assert!("id".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_page_request_floors() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 10));
        assert_eq!(PageRequest::new(-5, -1), PageRequest::new(1, 10));

        let page = PageRequest::new(3, 25);
        assert_eq!(page.page_number(), 3);
        assert_eq!(page.page_size(), 25);
    }

    #[test]
    fn test_page_request_does_not_cap_size() {
        let page = PageRequest::new(1, 500);
        assert_eq!(page.page_size(), 500);
    }

    #[test]
    fn test_skip_and_take() {
        let page = PageRequest::new(3, 4);
        assert_eq!(page.skip(), 8);
        assert_eq!(page.take(), 4);
        assert_eq!(PageRequest::default().skip(), 0);
    }

    #[test]
    fn test_pagination_metadata_page_count() {
        let page = PageRequest::new(1, 10);
        assert_eq!(PaginationMetadata::new(&page, 0).total_page_count, 0);
        assert_eq!(PaginationMetadata::new(&page, 10).total_page_count, 1);
        assert_eq!(PaginationMetadata::new(&page, 11).total_page_count, 2);

        let meta = PaginationMetadata::new(&PageRequest::new(2, 3), 7);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.page_size, 3);
        assert_eq!(meta.total_item_count, 7);
        assert_eq!(meta.total_page_count, 3);
    }
}
