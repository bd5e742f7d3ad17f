use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// PAGINATION
// =============================================================================

/// Pagination metadata returned alongside every list response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of records matching the query, ignoring pagination
    pub total_count: i64,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Number of items per page
    pub limit: i64,
    /// Total number of pages
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(total_count: i64, page: i64, limit: i64) -> Self {
        Self {
            total_count,
            page,
            limit,
            total_pages: total_pages(total_count, limit),
        }
    }
}

/// Ceiling division of total record count by page size
pub fn total_pages(total_count: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total_count + limit - 1) / limit
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: String, errors: Option<Vec<String>>) -> Self {
        Self { message, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_page_meta_carries_inputs() {
        let meta = PageMeta::new(42, 2, 10);
        assert_eq!(meta.total_count, 42);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.total_pages, 5);
    }

    #[test]
    fn test_sort_direction_wire_names() {
        assert_eq!(
            serde_json::from_str::<SortDirection>("\"ASC\"").unwrap(),
            SortDirection::Asc
        );
        assert_eq!(
            serde_json::from_str::<SortDirection>("\"DESC\"").unwrap(),
            SortDirection::Desc
        );
        assert!(serde_json::from_str::<SortDirection>("\"asc\"").is_err());
    }

    #[test]
    fn test_sort_direction_as_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}
