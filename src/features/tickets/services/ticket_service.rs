use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::tickets::dtos::{
    CreateTicketDto, StatusCounts, TicketQueryParams, TicketResponseDto, UpdateTicketDto,
};
use crate::features::tickets::models::{NewTicket, Ticket, TicketStatus};
use crate::features::tickets::repositories::TicketRepository;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::User;
use crate::features::users::repositories::UserRepository;

/// Service for ticket registry operations
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
    users: Arc<dyn UserRepository>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tickets, users }
    }

    /// Create a ticket.
    ///
    /// The user references are not resolved here; a dangling `created_by`
    /// surfaces as a database error. The returned ticket carries no
    /// hydrated relations.
    pub async fn create(&self, dto: CreateTicketDto) -> Result<TicketResponseDto> {
        let ticket = self
            .tickets
            .insert(NewTicket {
                title: dto.title,
                description: dto.description,
                status: dto.status.unwrap_or_default(),
                priority: dto.priority.unwrap_or_default(),
                assigned_to: dto.assigned_to,
                created_by: dto.created_by,
                tags: dto.tags,
            })
            .await?;

        tracing::info!("Ticket created: id={}, created_by={}", ticket.id, ticket.created_by);

        Ok(ticket.into())
    }

    /// List tickets matching the filter.
    ///
    /// Returns the hydrated page, the filtered total, and status counts
    /// over the whole ticket population. The counts deliberately ignore the
    /// active predicates.
    pub async fn find_all(
        &self,
        query: &TicketQueryParams,
    ) -> Result<(Vec<TicketResponseDto>, i64, StatusCounts)> {
        let (tickets, total) = self.tickets.find(query).await?;

        let users = self.resolve_users(&tickets).await?;
        let data = tickets
            .into_iter()
            .map(|t| Self::hydrate(t, &users))
            .collect();

        let counts = StatusCounts {
            open_count: self.tickets.count_by_status(TicketStatus::Open).await?,
            in_progress_count: self
                .tickets
                .count_by_status(TicketStatus::InProgress)
                .await?,
            resolved_count: self.tickets.count_by_status(TicketStatus::Resolved).await?,
        };

        Ok((data, total, counts))
    }

    /// Get a ticket by id, with creator and assignee hydrated
    pub async fn find_one(&self, id: i64) -> Result<TicketResponseDto> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket with ID {} not found", id)))?;

        let users = self.resolve_users(std::slice::from_ref(&ticket)).await?;
        Ok(Self::hydrate(ticket, &users))
    }

    /// Apply a partial update to a ticket.
    ///
    /// A changed `assigned_to` is resolved before anything is written; the
    /// whole update fails if the new assignee does not exist. After the
    /// save, the row is re-read and the freshly resolved assignee overrides
    /// whatever the re-read produced.
    pub async fn update(&self, id: i64, dto: UpdateTicketDto) -> Result<TicketResponseDto> {
        let mut ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket with ID {} not found", id)))?;

        let mut new_assignee: Option<User> = None;
        if let Some(assigned_to) = dto.assigned_to {
            if ticket.assigned_to != Some(assigned_to) {
                let user = self.users.find_by_id(assigned_to).await?.ok_or_else(|| {
                    AppError::NotFound(format!("User with ID {} not found", assigned_to))
                })?;
                new_assignee = Some(user);
            }
        }

        if let Some(title) = dto.title {
            ticket.title = title;
        }
        if let Some(description) = dto.description {
            ticket.description = description;
        }
        if let Some(status) = dto.status {
            ticket.status = status;
        }
        if let Some(priority) = dto.priority {
            ticket.priority = priority;
        }
        if let Some(assigned_to) = dto.assigned_to {
            ticket.assigned_to = Some(assigned_to);
        }
        if let Some(tags) = dto.tags {
            ticket.tags = tags;
        }

        self.tickets.update(&ticket).await?;

        // Fresh read so the response reflects whatever the store persisted.
        let fresh = self.tickets.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Ticket with ID {} not found after update", id))
        })?;

        let users = self.resolve_users(std::slice::from_ref(&fresh)).await?;
        let mut response = Self::hydrate(fresh, &users);

        if let Some(user) = new_assignee {
            response.assignee = Some(user.into());
        }

        tracing::info!("Ticket updated: id={}", id);

        Ok(response)
    }

    /// Delete a ticket by id
    pub async fn remove(&self, id: i64) -> Result<()> {
        let deleted = self.tickets.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("Ticket with ID {} not found", id)));
        }

        tracing::info!("Ticket deleted: id={}", id);

        Ok(())
    }

    /// Batch-resolve every user referenced by the given tickets
    async fn resolve_users(&self, tickets: &[Ticket]) -> Result<HashMap<Uuid, UserResponseDto>> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(tickets.len() * 2);
        for ticket in tickets {
            ids.push(ticket.created_by);
            if let Some(assigned_to) = ticket.assigned_to {
                ids.push(assigned_to);
            }
        }
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.into())).collect())
    }

    fn hydrate(ticket: Ticket, users: &HashMap<Uuid, UserResponseDto>) -> TicketResponseDto {
        let creator = users.get(&ticket.created_by).cloned();
        let assignee = ticket.assigned_to.and_then(|id| users.get(&id).cloned());

        let mut dto = TicketResponseDto::from(ticket);
        dto.creator = creator;
        dto.assignee = assignee;
        dto
    }
}
