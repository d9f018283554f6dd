//! Query shaping - translate request parameters into the store's vocabulary.

use serde::Serialize;

use crate::error::DomainError;

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }
}

/// Field name plus direction. The field is not checked here; the store
/// rejects names it does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::from_ascending(ascending),
        }
    }
}

/// A zero-based page index and a page size of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u64,
    size: u64,
}

impl PageRequest {
    pub fn new(index: u64, size: u64) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { index, size })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of elements to skip before this page starts.
    pub fn offset(&self) -> u64 {
        self.index.saturating_mul(self.size)
    }

    /// Total pages needed for `total_elements`.
    pub fn total_pages(&self, total_elements: u64) -> u64 {
        total_elements.div_ceil(self.size)
    }
}

/// One page of results plus the totals reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_index: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_index: request.index(),
            page_size: request.size(),
            total_elements,
            total_pages: request.total_pages(total_elements),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn direction_follows_ascending_flag() {
        assert_eq!(SortDirection::from_ascending(true), SortDirection::Asc);
        assert_eq!(SortDirection::from_ascending(false), SortDirection::Desc);
        assert_eq!(SortOrder::new("id", false).direction, SortDirection::Desc);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 10)]
    #[case(2, 20)]
    #[case(3, 30)]
    fn offset_is_index_times_size(#[case] index: u64, #[case] expected: u64) {
        let request = PageRequest::new(index, 10).unwrap();
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 1)]
    #[case(25, 3)]
    #[case(30, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] pages: u64) {
        let request = PageRequest::new(0, 10).unwrap();
        assert_eq!(request.total_pages(total), pages);
    }
}
