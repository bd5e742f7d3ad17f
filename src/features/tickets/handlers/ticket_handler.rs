use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::tickets::dtos::{
    CreateTicketDto, TicketListMeta, TicketListResponse, TicketQueryParams, TicketResponseDto,
    UpdateTicketDto,
};
use crate::features::tickets::services::TicketService;
use crate::shared::types::ErrorResponse;

/// Create a new ticket
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = TicketResponseDto),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketDto>,
) -> Result<(StatusCode, Json<TicketResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets with filters and pagination.
///
/// The meta block carries the filtered total plus open/in-progress/resolved
/// counts computed over all tickets regardless of the active filters.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(TicketQueryParams),
    responses(
        (status = 200, description = "Page of tickets with pagination and status-count metadata", body = TicketListResponse),
    ),
    tag = "tickets"
)]
pub async fn list_tickets(
    State(service): State<Arc<TicketService>>,
    Query(query): Query<TicketQueryParams>,
) -> Result<Json<TicketListResponse>> {
    let (data, total_count, counts) = service.find_all(&query).await?;

    let meta = TicketListMeta::new(total_count, query.page, query.page_size(), counts);
    Ok(Json(TicketListResponse { data, meta }))
}

/// Get a ticket by id
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket found", body = TicketResponseDto),
        (status = 404, description = "Ticket not found", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn get_ticket(
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
) -> Result<Json<TicketResponseDto>> {
    let ticket = service.find_one(id).await?;
    Ok(Json(ticket))
}

/// Partially update a ticket
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    request_body = UpdateTicketDto,
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponseDto),
        (status = 404, description = "Ticket or new assignee not found", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn update_ticket(
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateTicketDto>,
) -> Result<Json<TicketResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.update(id, dto).await?;
    Ok(Json(ticket))
}

/// Delete a ticket
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    responses(
        (status = 204, description = "Ticket deleted"),
        (status = 404, description = "Ticket not found", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn delete_ticket(
    State(service): State<Arc<TicketService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
