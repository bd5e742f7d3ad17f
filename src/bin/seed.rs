//! Development seeder: populates an empty database with 5 users and 15
//! tickets, assigning creators and assignees round-robin. Safe to re-run;
//! tables that already contain rows are left untouched.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// First ticket id handed out when seeding an empty tickets table
const TICKET_ID_SEED_OFFSET: i64 = 1_000_000;

struct MockUser {
    email: &'static str,
    name: &'static str,
    password: &'static str,
    avatar: &'static str,
}

struct MockTicket {
    title: &'static str,
    description: &'static str,
    status: &'static str,
    priority: &'static str,
    tags: &'static [&'static str],
}

const MOCK_USERS: &[MockUser] = &[
    MockUser {
        email: "john.doe@example.com",
        name: "John Doe",
        password: "password123",
        avatar: "https://randomuser.me/api/portraits/men/1.jpg",
    },
    MockUser {
        email: "jane.smith@example.com",
        name: "Jane Smith",
        password: "password123",
        avatar: "https://randomuser.me/api/portraits/women/2.jpg",
    },
    MockUser {
        email: "mike.wilson@example.com",
        name: "Mike Wilson",
        password: "password123",
        avatar: "https://randomuser.me/api/portraits/men/3.jpg",
    },
    MockUser {
        email: "sarah.johnson@example.com",
        name: "Sarah Johnson",
        password: "password123",
        avatar: "https://randomuser.me/api/portraits/women/4.jpg",
    },
    MockUser {
        email: "david.thompson@example.com",
        name: "David Thompson",
        password: "password123",
        avatar: "https://randomuser.me/api/portraits/men/5.jpg",
    },
];

const MOCK_TICKETS: &[MockTicket] = &[
    MockTicket {
        title: "Fix login page styling",
        description: "The login page has alignment issues on mobile devices. Need to fix the CSS.",
        status: "open",
        priority: "medium",
        tags: &["frontend", "css", "mobile"],
    },
    MockTicket {
        title: "Implement password reset functionality",
        description: "Create an endpoint and email delivery system for password reset.",
        status: "in_progress",
        priority: "high",
        tags: &["backend", "security", "email"],
    },
    MockTicket {
        title: "Add unit tests for user service",
        description: "Write comprehensive unit tests for all methods in the user service.",
        status: "review",
        priority: "medium",
        tags: &["testing", "backend"],
    },
    MockTicket {
        title: "Database optimization for reports",
        description: "The reports page loads slowly. Need to optimize the database queries.",
        status: "open",
        priority: "critical",
        tags: &["database", "performance"],
    },
    MockTicket {
        title: "Update dependencies to latest versions",
        description: "Some dependencies are outdated and have security vulnerabilities.",
        status: "resolved",
        priority: "low",
        tags: &["maintenance", "security"],
    },
    MockTicket {
        title: "Implement dark mode",
        description: "Add dark mode support across the entire application with toggle in settings.",
        status: "open",
        priority: "medium",
        tags: &["frontend", "ui", "feature"],
    },
    MockTicket {
        title: "Fix broken image upload on profile page",
        description: "Users are unable to upload profile pictures. Investigation needed.",
        status: "in_progress",
        priority: "high",
        tags: &["frontend", "bug", "upload"],
    },
    MockTicket {
        title: "Add pagination to dashboard tables",
        description: "All tables on the dashboard need to be paginated to improve performance.",
        status: "open",
        priority: "medium",
        tags: &["frontend", "performance", "ui"],
    },
    MockTicket {
        title: "Investigate and fix memory leak",
        description: "The application becomes slow after extended use. Possible memory leak to investigate.",
        status: "in_progress",
        priority: "critical",
        tags: &["backend", "performance", "bug"],
    },
    MockTicket {
        title: "Add audit logging for sensitive operations",
        description: "Need to implement audit logging for user creation, deletion, and permission changes.",
        status: "open",
        priority: "high",
        tags: &["backend", "security", "audit"],
    },
    MockTicket {
        title: "Update API documentation",
        description: "API documentation is outdated. Update to reflect recent changes.",
        status: "review",
        priority: "low",
        tags: &["documentation", "api"],
    },
    MockTicket {
        title: "Implement email notifications",
        description: "Add email notifications for ticket updates and assignments.",
        status: "open",
        priority: "medium",
        tags: &["backend", "email", "feature"],
    },
    MockTicket {
        title: "Add export to CSV feature",
        description: "Users need to be able to export ticket lists to CSV format.",
        status: "closed",
        priority: "low",
        tags: &["frontend", "feature", "export"],
    },
    MockTicket {
        title: "Fix CORS issues with third-party API",
        description: "Integration with third-party API is failing due to CORS configuration.",
        status: "open",
        priority: "high",
        tags: &["backend", "integration", "bug"],
    },
    MockTicket {
        title: "Implement SSO authentication",
        description: "Integrate with company-wide SSO system for authentication.",
        status: "in_progress",
        priority: "critical",
        tags: &["backend", "security", "authentication"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let users = seed_users(&pool).await?;
    seed_tickets(&pool, &users).await?;

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::info!(
            "Found {} existing users. Fetching them instead of seeding...",
            existing
        );
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM users ORDER BY created_at LIMIT 5")
                .fetch_all(pool)
                .await?;
        return Ok(ids);
    }

    tracing::info!("Seeding users...");
    let mut ids = Vec::with_capacity(MOCK_USERS.len());
    for user in MOCK_USERS {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, name, password, avatar) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user.email)
        .bind(user.name)
        .bind(user.password)
        .bind(user.avatar)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    tracing::info!("Successfully seeded {} users", ids.len());
    Ok(ids)
}

async fn seed_tickets(pool: &PgPool, users: &[Uuid]) -> anyhow::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
        .fetch_one(pool)
        .await?;

    if existing > 0 || users.is_empty() {
        tracing::info!(
            "Skipping ticket seeding. {} tickets already exist.",
            existing
        );
        return Ok(());
    }

    // Policy: hand out ids starting at a recognizable offset on a fresh database.
    sqlx::query(&format!(
        "ALTER SEQUENCE tickets_id_seq RESTART WITH {}",
        TICKET_ID_SEED_OFFSET
    ))
    .execute(pool)
    .await?;

    tracing::info!("Seeding tickets...");
    for (i, ticket) in MOCK_TICKETS.iter().enumerate() {
        let created_by = users[i % users.len()];
        let assigned_to = users[(i + 1) % users.len()];
        let tags: Vec<String> = ticket.tags.iter().map(|t| t.to_string()).collect();

        sqlx::query(
            "INSERT INTO tickets (title, description, status, priority, assigned_to, created_by, tags) \
             VALUES ($1, $2, $3::ticket_status, $4::ticket_priority, $5, $6, $7)",
        )
        .bind(ticket.title)
        .bind(ticket.description)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(assigned_to)
        .bind(created_by)
        .bind(&tags)
        .execute(pool)
        .await?;
    }

    tracing::info!("Successfully seeded {} tickets", MOCK_TICKETS.len());
    Ok(())
}
