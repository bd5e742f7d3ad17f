use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::tickets::dtos::TicketQueryParams;
use crate::features::tickets::models::{NewTicket, Ticket, TicketStatus};

const TICKET_COLUMNS: &str =
    "id, title, description, status, priority, assigned_to, created_by, tags, \
     created_at, updated_at";

/// Narrow storage interface for the `tickets` table
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, data: NewTicket) -> Result<Ticket>;
    async fn find(&self, query: &TicketQueryParams) -> Result<(Vec<Ticket>, i64)>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>>;
    async fn update(&self, ticket: &Ticket) -> Result<Ticket>;
    async fn delete(&self, id: i64) -> Result<u64>;
    async fn count_by_status(&self, status: TicketStatus) -> Result<i64>;
}

/// PostgreSQL-backed ticket repository
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append the equality predicates and the title search to a query.
    ///
    /// Shared between the page query and the count query so both see the
    /// same predicate set.
    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &TicketQueryParams) {
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = query.priority {
            qb.push(" AND priority = ").push_bind(priority);
        }
        if let Some(assigned_to) = query.assigned_to {
            qb.push(" AND assigned_to = ").push_bind(assigned_to);
        }
        if let Some(created_by) = query.created_by {
            qb.push(" AND created_by = ").push_bind(created_by);
        }
        // Search is a single-field match on the title only.
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND title LIKE ").push_bind(format!("%{}%", search));
        }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn insert(&self, data: NewTicket) -> Result<Ticket> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (title, description, status, priority, assigned_to, created_by, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, title, description, status, priority, assigned_to, created_by, tags, \
                       created_at, updated_at",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.created_by)
        .bind(&data.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert ticket: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ticket)
    }

    async fn find(&self, query: &TicketQueryParams) -> Result<(Vec<Ticket>, i64)> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM tickets WHERE 1=1");
        Self::push_filters(&mut count_qb, query);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count tickets: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {} FROM tickets WHERE 1=1", TICKET_COLUMNS));
        Self::push_filters(&mut qb, query);
        qb.push(" ORDER BY ")
            .push(query.sort_by.as_sql())
            .push(" ")
            .push(query.sort_order.as_sql());
        qb.push(" LIMIT ")
            .push_bind(query.page_size())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let tickets = qb
            .build_query_as::<Ticket>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tickets: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((tickets, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT id, title, description, status, priority, assigned_to, created_by, tags, \
                    created_at, updated_at \
             FROM tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get ticket by id: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ticket)
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket> {
        let updated = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET title = $2, description = $3, status = $4, priority = $5, \
                    assigned_to = $6, created_by = $7, tags = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, title, description, status, priority, assigned_to, created_by, tags, \
                       created_at, updated_at",
        )
        .bind(ticket.id)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(ticket.assigned_to)
        .bind(ticket.created_by)
        .bind(&ticket.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update ticket: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete ticket: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count tickets by status: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(count)
    }
}
