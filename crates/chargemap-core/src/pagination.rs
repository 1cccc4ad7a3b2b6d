use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// Upper bound on `page_size` when the caller does not configure one.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// A validated page window: 1-based `page`, `page_size` in `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate raw paging parameters.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPage`] if `page < 1` and
    /// [`QueryError::InvalidPageSize`] if `page_size` is outside
    /// `1..=max_page_size`. Pages above `u32::MAX` saturate and so land past
    /// the end of any partition.
    pub fn new(page: i64, page_size: i64, max_page_size: u32) -> Result<Self, QueryError> {
        if page < 1 {
            return Err(QueryError::InvalidPage(page));
        }
        let page = u32::try_from(page).unwrap_or(u32::MAX);
        let page_size = u32::try_from(page_size)
            .ok()
            .filter(|s| (1..=max_page_size).contains(s))
            .ok_or(QueryError::InvalidPageSize {
                requested: page_size,
                max: max_page_size,
            })?;
        Ok(Self { page, page_size })
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records that precede this page.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    #[must_use]
    pub fn take(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One page of results plus totals for the whole partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> PaginatedResult<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.page_size));
        Self {
            items,
            total_count,
            page: request.page,
            page_size: request.page_size,
            total_pages,
            has_next_page: u64::from(request.page) < total_pages,
            has_previous_page: request.page > 1,
        }
    }

    /// Convert the items while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: i64, size: i64) -> PageRequest {
        PageRequest::new(page, size, DEFAULT_MAX_PAGE_SIZE).expect("valid page request")
    }

    #[test]
    fn rejects_page_below_one() {
        assert!(matches!(
            PageRequest::new(0, 10, 100),
            Err(QueryError::InvalidPage(0))
        ));
        assert!(matches!(
            PageRequest::new(-3, 10, 100),
            Err(QueryError::InvalidPage(-3))
        ));
    }

    #[test]
    fn rejects_page_size_out_of_bounds() {
        assert!(matches!(
            PageRequest::new(1, 0, 100),
            Err(QueryError::InvalidPageSize { requested: 0, max: 100 })
        ));
        assert!(matches!(
            PageRequest::new(1, 101, 100),
            Err(QueryError::InvalidPageSize { requested: 101, max: 100 })
        ));
        assert!(PageRequest::new(1, 100, 100).is_ok());
    }

    #[test]
    fn huge_page_saturates_to_an_empty_page() {
        let r = request(99_999_999_999, 10);
        assert_eq!(r.page(), u32::MAX);
        assert_eq!(r.skip(), u64::from(u32::MAX - 1) * 10);

        let result: PaginatedResult<u8> = PaginatedResult::new(vec![], 25, r);
        assert!(!result.has_next_page);
        assert!(result.has_previous_page);
    }

    #[test]
    fn skip_and_take_follow_page_window() {
        let r = request(3, 10);
        assert_eq!(r.skip(), 20);
        assert_eq!(r.take(), 10);
        assert_eq!(request(1, 25).skip(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let result = PaginatedResult::new(vec![1; 10], 25, request(1, 10));
        assert_eq!(result.total_pages, 3);
        assert!(result.has_next_page);
        assert!(!result.has_previous_page);
    }

    #[test]
    fn empty_partition_has_zero_pages() {
        let result: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, request(1, 10));
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_next_page);
        assert!(!result.has_previous_page);
    }

    #[test]
    fn last_and_past_last_pages() {
        let last = PaginatedResult::new(vec![1; 5], 25, request(3, 10));
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);

        let beyond: PaginatedResult<u8> = PaginatedResult::new(vec![], 25, request(4, 10));
        assert!(!beyond.has_next_page);
        assert!(beyond.has_previous_page);
    }

    #[test]
    fn map_preserves_metadata() {
        let result = PaginatedResult::new(vec![1, 2], 12, request(2, 2)).map(|n| n * 10);
        assert_eq!(result.items, vec![10, 20]);
        assert_eq!(result.total_count, 12);
        assert_eq!(result.total_pages, 6);
        assert_eq!(result.page, 2);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let result = PaginatedResult::new(vec!["a"], 1, request(1, 10));
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "items",
            "totalCount",
            "page",
            "pageSize",
            "totalPages",
            "hasNextPage",
            "hasPreviousPage",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
