//! Pagination request normalization and the page envelope

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Raw pagination parameters as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Normalize to `page >= 1` and `page_size` in `[1, 100]`,
    /// applying defaults for missing values.
    pub fn normalize(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }

    /// Row offset for the normalized request, never negative.
    pub fn offset(&self) -> u64 {
        let (page, page_size) = self.normalize();
        u64::from(page - 1) * u64::from(page_size)
    }
}

/// One page of results plus collection-wide metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build the envelope for an already-normalized page/page_size pair.
    pub fn new(data: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size)) as u32
        };

        Self {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.normalize(), (1, 10));
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_zero_normalizes_to_one() {
        let req = PageRequest::new(0, 10);
        assert_eq!(req.normalize(), (1, 10));
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_size_clamped_to_max() {
        let req = PageRequest::new(1, 500);
        assert_eq!(req.normalize(), (1, 100));
    }

    #[test]
    fn test_page_size_zero_normalizes_to_one() {
        let req = PageRequest::new(3, 0);
        assert_eq!(req.normalize(), (3, 1));
        assert_eq!(req.offset(), 2);
    }

    #[test]
    fn test_offset_for_later_pages() {
        let req = PageRequest::new(2, 10);
        assert_eq!(req.offset(), 10);

        let req = PageRequest::new(5, 25);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_envelope_total_pages() {
        let page = Page::new(vec![1, 2, 3], 25, 2, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_envelope_exact_division() {
        let page: Page<i32> = Page::new(vec![], 20, 3, 10);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let page: Page<i32> = Page::new(vec![], 0, 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_envelope_serialization_field_names() {
        let page = Page::new(vec![1], 1, 1, 10);
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"pageSize\":10"));
        assert!(json.contains("\"totalPages\":1"));
        assert!(json.contains("\"total\":1"));
    }

    #[test]
    fn test_query_string_deserialization() {
        let req: PageRequest = serde_json::from_str(r#"{"page":2,"pageSize":50}"#).unwrap();
        assert_eq!(req.normalize(), (2, 50));
    }
}
