use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::tickets::dtos::{CreateTicketDto, TicketQueryParams, TicketSortBy};
use crate::features::tickets::models::{NewTicket, Ticket, TicketPriority, TicketStatus};
use crate::features::tickets::repositories::TicketRepository;
use crate::features::tickets::services::TicketService;
use crate::features::users::dtos::{CreateUserDto, UserQueryParams, UserResponseDto, UserSortBy};
use crate::features::users::models::{NewUser, User};
use crate::features::users::repositories::UserRepository;
use crate::features::users::services::UserService;
use crate::shared::types::SortDirection;

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

// =============================================================================
// USERS
// =============================================================================

/// In-memory stand-in for `PgUserRepository`, mirroring its filter, sort,
/// and pagination semantics over a plain Vec.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, data: NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            name: data.name,
            password: data.password,
            avatar: data.avatar,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find(&self, query: &UserQueryParams) -> Result<(Vec<User>, i64)> {
        let users = self.users.lock().unwrap();

        // LIKE on name is case-sensitive under the default collation.
        let mut matching: Vec<User> = users
            .iter()
            .filter(|u| match query.search.as_deref() {
                Some(search) if !search.is_empty() => u.name.contains(search),
                _ => true,
            })
            .cloned()
            .collect();
        let total = matching.len() as i64;

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                UserSortBy::Id => a.id.cmp(&b.id),
                UserSortBy::Email => a.email.cmp(&b.email),
                UserSortBy::Name => a.name.cmp(&b.name),
                UserSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                UserSortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            apply_direction(ordering, query.sort_order)
        });

        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size() as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .expect("update of unknown user");
        *stored = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }
}

// =============================================================================
// TICKETS
// =============================================================================

/// In-memory stand-in for `PgTicketRepository` with a monotonically
/// increasing id generator.
pub struct InMemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
    next_id: AtomicI64,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn status_rank(status: TicketStatus) -> u8 {
    match status {
        TicketStatus::Open => 0,
        TicketStatus::InProgress => 1,
        TicketStatus::Review => 2,
        TicketStatus::Resolved => 3,
        TicketStatus::Closed => 4,
    }
}

fn priority_rank(priority: TicketPriority) -> u8 {
    match priority {
        TicketPriority::Low => 0,
        TicketPriority::Medium => 1,
        TicketPriority::High => 2,
        TicketPriority::Critical => 3,
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, data: NewTicket) -> Result<Ticket> {
        let now = Utc::now();
        let ticket = Ticket {
            id: self.next_id.fetch_add(1, AtomicOrdering::SeqCst),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            tags: data.tags,
            created_at: now,
            updated_at: now,
        };
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(ticket)
    }

    async fn find(&self, query: &TicketQueryParams) -> Result<(Vec<Ticket>, i64)> {
        let tickets = self.tickets.lock().unwrap();

        let mut matching: Vec<Ticket> = tickets
            .iter()
            .filter(|t| {
                query.status.is_none_or(|s| t.status == s)
                    && query.priority.is_none_or(|p| t.priority == p)
                    && query.assigned_to.is_none_or(|a| t.assigned_to == Some(a))
                    && query.created_by.is_none_or(|c| t.created_by == c)
                    && match query.search.as_deref() {
                        Some(search) if !search.is_empty() => t.title.contains(search),
                        _ => true,
                    }
            })
            .cloned()
            .collect();
        let total = matching.len() as i64;

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                TicketSortBy::Id => a.id.cmp(&b.id),
                TicketSortBy::Title => a.title.cmp(&b.title),
                TicketSortBy::Description => a.description.cmp(&b.description),
                TicketSortBy::Status => status_rank(a.status).cmp(&status_rank(b.status)),
                TicketSortBy::Priority => {
                    priority_rank(a.priority).cmp(&priority_rank(b.priority))
                }
                TicketSortBy::AssignedTo => a.assigned_to.cmp(&b.assigned_to),
                TicketSortBy::CreatedBy => a.created_by.cmp(&b.created_by),
                TicketSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                TicketSortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            // Ties fall back to the insertion id so pages stay stable.
            apply_direction(ordering.then(a.id.cmp(&b.id)), query.sort_order)
        });

        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size() as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket> {
        let mut tickets = self.tickets.lock().unwrap();
        let stored = tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .expect("update of unknown ticket");
        *stored = Ticket {
            updated_at: Utc::now(),
            ..ticket.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let mut tickets = self.tickets.lock().unwrap();
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        Ok((before - tickets.len()) as u64)
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<i64> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.status == status)
            .count() as i64)
    }
}

// =============================================================================
// FIXTURE
// =============================================================================

/// Seed the fixture scenario: 5 users and 15 tickets with creator `i % 5`
/// and assignee `(i + 1) % 5`. Status spread: 7 open, 4 in_progress,
/// 2 review, 1 resolved, 1 closed.
pub async fn seed_round_robin_fixture(
    users: &UserService,
    tickets: &TicketService,
) -> Vec<UserResponseDto> {
    let people = [
        ("john.doe@example.com", "John Doe"),
        ("jane.smith@example.com", "Jane Smith"),
        ("mike.wilson@example.com", "Mike Wilson"),
        ("sarah.johnson@example.com", "Sarah Johnson"),
        ("david.thompson@example.com", "David Thompson"),
    ];

    let mut seeded = Vec::with_capacity(people.len());
    for (email, name) in people {
        seeded.push(
            users
                .create(CreateUserDto {
                    email: email.to_string(),
                    name: name.to_string(),
                    password: "password123".to_string(),
                    avatar: None,
                })
                .await
                .unwrap(),
        );
    }

    let fixtures: [(&str, TicketStatus, TicketPriority); 15] = [
        ("Fix login page styling", TicketStatus::Open, TicketPriority::Medium),
        ("Implement password reset functionality", TicketStatus::InProgress, TicketPriority::High),
        ("Add unit tests for user service", TicketStatus::Review, TicketPriority::Medium),
        ("Database optimization for reports", TicketStatus::Open, TicketPriority::Critical),
        ("Update dependencies to latest versions", TicketStatus::Resolved, TicketPriority::Low),
        ("Implement dark mode", TicketStatus::Open, TicketPriority::Medium),
        ("Fix broken image upload on profile page", TicketStatus::InProgress, TicketPriority::High),
        ("Add pagination to dashboard tables", TicketStatus::Open, TicketPriority::Medium),
        ("Investigate and fix memory leak", TicketStatus::InProgress, TicketPriority::Critical),
        ("Add audit logging for sensitive operations", TicketStatus::Open, TicketPriority::High),
        ("Update API documentation", TicketStatus::Review, TicketPriority::Low),
        ("Implement email notifications", TicketStatus::Open, TicketPriority::Medium),
        ("Add export to CSV feature", TicketStatus::Closed, TicketPriority::Low),
        ("Fix CORS issues with third-party API", TicketStatus::Open, TicketPriority::High),
        ("Implement SSO authentication", TicketStatus::InProgress, TicketPriority::Critical),
    ];

    for (i, (title, status, priority)) in fixtures.into_iter().enumerate() {
        tickets
            .create(CreateTicketDto {
                title: title.to_string(),
                description: format!("{} (fixture)", title),
                status: Some(status),
                priority: Some(priority),
                assigned_to: Some(seeded[(i + 1) % seeded.len()].id),
                created_by: seeded[i % seeded.len()].id,
                tags: vec![],
            })
            .await
            .unwrap();
    }

    seeded
}
