use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::tickets::models::{Ticket, TicketPriority, TicketStatus};
use crate::features::users::dtos::UserResponseDto;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::SortDirection;

/// Request DTO for creating a ticket
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Defaults to `open` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    /// Defaults to `medium` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,

    pub created_by: Uuid,

    pub tags: Vec<String>,
}

/// Request DTO for partially updating a ticket
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Response DTO for a ticket.
///
/// `creator` and `assignee` are hydrated on reads; create responses carry
/// only the raw reference columns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserResponseDto>,
}

impl From<Ticket> for TicketResponseDto {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            priority: t.priority,
            assigned_to: t.assigned_to,
            created_by: t.created_by,
            tags: t.tags,
            created_at: t.created_at,
            updated_at: t.updated_at,
            creator: None,
            assignee: None,
        }
    }
}

/// Population-wide ticket counts by status, independent of any list filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub open_count: i64,
    pub in_progress_count: i64,
    pub resolved_count: i64,
}

/// Pagination and status-count metadata for ticket listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketListMeta {
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub open_count: i64,
    pub in_progress_count: i64,
    pub resolved_count: i64,
}

impl TicketListMeta {
    pub fn new(total_count: i64, page: i64, limit: i64, counts: StatusCounts) -> Self {
        Self {
            total_count,
            page,
            limit,
            total_pages: crate::shared::types::total_pages(total_count, limit),
            open_count: counts.open_count,
            in_progress_count: counts.in_progress_count,
            resolved_count: counts.resolved_count,
        }
    }
}

/// List response envelope for tickets
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketListResponse {
    pub data: Vec<TicketResponseDto>,
    pub meta: TicketListMeta,
}

/// Sort fields for ticket listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TicketSortBy {
    Id,
    Title,
    Description,
    Status,
    Priority,
    AssignedTo,
    CreatedBy,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl TicketSortBy {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TicketSortBy::Id => "id",
            TicketSortBy::Title => "title",
            TicketSortBy::Description => "description",
            TicketSortBy::Status => "status",
            TicketSortBy::Priority => "priority",
            TicketSortBy::AssignedTo => "assigned_to",
            TicketSortBy::CreatedBy => "created_by",
            TicketSortBy::CreatedAt => "created_at",
            TicketSortBy::UpdatedAt => "updated_at",
        }
    }
}

/// Query params for listing tickets
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TicketQueryParams {
    /// Exact-match status filter
    pub status: Option<TicketStatus>,
    /// Exact-match priority filter
    pub priority: Option<TicketPriority>,
    /// Filter by assigned user id
    pub assigned_to: Option<Uuid>,
    /// Filter by creator user id
    pub created_by: Option<Uuid>,
    /// Substring match on the ticket title
    pub search: Option<String>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
    /// Sort field (default: createdAt)
    #[serde(default)]
    pub sort_by: TicketSortBy,
    /// Sort direction (default: DESC)
    #[serde(default)]
    pub sort_order: SortDirection,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for TicketQueryParams {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            assigned_to: None,
            created_by: None,
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: TicketSortBy::default(),
            sort_order: SortDirection::default(),
        }
    }
}

impl TicketQueryParams {
    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.page_size()
    }

    /// Get clamped page size (respects MAX_PAGE_SIZE)
    pub fn page_size(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_maps_to_columns() {
        assert_eq!(TicketSortBy::AssignedTo.as_sql(), "assigned_to");
        assert_eq!(TicketSortBy::CreatedBy.as_sql(), "created_by");
        assert_eq!(TicketSortBy::CreatedAt.as_sql(), "created_at");
        assert_eq!(TicketSortBy::Priority.as_sql(), "priority");
    }

    #[test]
    fn test_sort_by_deserializes_camel_case() {
        assert_eq!(
            serde_json::from_str::<TicketSortBy>("\"assignedTo\"").unwrap(),
            TicketSortBy::AssignedTo
        );
        assert!(serde_json::from_str::<TicketSortBy>("\"tags\"").is_err());
    }

    #[test]
    fn test_list_meta_combines_pages_and_counts() {
        let meta = TicketListMeta::new(
            12,
            2,
            5,
            StatusCounts {
                open_count: 7,
                in_progress_count: 4,
                resolved_count: 1,
            },
        );
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.open_count, 7);

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalCount"], 12);
        assert_eq!(json["inProgressCount"], 4);
        assert_eq!(json["resolvedCount"], 1);
    }

    #[test]
    fn test_create_response_omits_unhydrated_relations() {
        let ticket = Ticket {
            id: 1,
            title: "Fix login page styling".to_string(),
            description: "Alignment issues on mobile".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            assigned_to: None,
            created_by: Uuid::new_v4(),
            tags: vec!["frontend".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(TicketResponseDto::from(ticket)).unwrap();
        assert!(json.get("creator").is_none());
        assert!(json.get("assignee").is_none());
        assert!(json.get("assignedTo").is_none());
        assert_eq!(json["status"], "open");
    }
}
