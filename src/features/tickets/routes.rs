use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::tickets::handlers;
use crate::features::tickets::services::TicketService;

/// Create routes for the tickets feature
pub fn routes(service: Arc<TicketService>) -> Router {
    Router::new()
        .route(
            "/api/v1/tickets",
            post(handlers::create_ticket).get(handlers::list_tickets),
        )
        .route(
            "/api/v1/tickets/{id}",
            get(handlers::get_ticket)
                .patch(handlers::update_ticket)
                .delete(handlers::delete_ticket),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tickets::repositories::TicketRepository;
    use crate::features::users::repositories::UserRepository;
    use crate::features::users::services::UserService;
    use crate::shared::test_helpers::{
        seed_round_robin_fixture, InMemoryTicketRepository, InMemoryUserRepository,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    struct Harness {
        server: TestServer,
        users: UserService,
        tickets: Arc<TicketService>,
    }

    fn harness() -> Harness {
        let user_repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let ticket_repo: Arc<dyn TicketRepository> = Arc::new(InMemoryTicketRepository::new());
        let tickets = Arc::new(TicketService::new(ticket_repo, Arc::clone(&user_repo)));
        let users = UserService::new(user_repo);
        let server = TestServer::new(routes(Arc::clone(&tickets))).unwrap();
        Harness {
            server,
            users,
            tickets,
        }
    }

    #[tokio::test]
    async fn test_filtered_list_keeps_global_status_counts() {
        let harness = harness();
        seed_round_robin_fixture(&harness.users, &harness.tickets).await;

        let response = harness
            .server
            .get("/api/v1/tickets")
            .add_query_param("status", "open")
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 7);
        assert!(data.iter().all(|t| t["status"] == "open"));

        // Counts describe all 15 tickets, not just the filtered page.
        assert_eq!(body["meta"]["totalCount"], 7);
        assert_eq!(body["meta"]["openCount"], 7);
        assert_eq!(body["meta"]["inProgressCount"], 4);
        assert_eq!(body["meta"]["resolvedCount"], 1);
    }

    #[tokio::test]
    async fn test_list_hydrates_relations_in_json() {
        let harness = harness();
        seed_round_robin_fixture(&harness.users, &harness.tickets).await;

        let response = harness
            .server
            .get("/api/v1/tickets")
            .add_query_param("limit", "15")
            .await;
        let body: serde_json::Value = response.json();
        let first = &body["data"][0];

        assert_eq!(first["creator"]["id"], first["createdBy"]);
        assert!(first["creator"].get("password").is_none());
        assert_eq!(first["assignee"]["id"], first["assignedTo"]);
    }

    #[tokio::test]
    async fn test_pagination_meta_of_fifteen() {
        let harness = harness();
        seed_round_robin_fixture(&harness.users, &harness.tickets).await;

        let response = harness
            .server
            .get("/api/v1/tickets")
            .add_query_param("page", "2")
            .add_query_param("limit", "5")
            .await;
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["meta"]["totalCount"], 15);
        assert_eq!(body["meta"]["totalPages"], 3);
    }

    #[tokio::test]
    async fn test_create_returns_201_with_defaults() {
        let harness = harness();
        let creator = harness
            .users
            .create(crate::features::users::dtos::CreateUserDto {
                email: "creator@example.com".to_string(),
                name: "Creator".to_string(),
                password: "password123".to_string(),
                avatar: None,
            })
            .await
            .unwrap();

        let response = harness
            .server
            .post("/api/v1/tickets")
            .json(&json!({
                "title": "Fix login page styling",
                "description": "Alignment issues on mobile",
                "createdBy": creator.id,
                "tags": ["frontend", "css"]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "open");
        assert_eq!(body["priority"], "medium");
        assert!(body.get("creator").is_none());
    }

    #[tokio::test]
    async fn test_missing_title_returns_400() {
        let harness = harness();

        let response = harness
            .server
            .post("/api/v1/tickets")
            .json(&json!({
                "title": "",
                "description": "No title",
                "createdBy": uuid::Uuid::new_v4(),
                "tags": []
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_ticket_returns_404() {
        let harness = harness();
        harness
            .server
            .get("/api/v1/tickets/4242")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_missing_assignee_returns_404() {
        let harness = harness();
        seed_round_robin_fixture(&harness.users, &harness.tickets).await;

        let listed: serde_json::Value = harness.server.get("/api/v1/tickets").await.json();
        let id = listed["data"][0]["id"].as_i64().unwrap();

        let response = harness
            .server
            .patch(&format!("/api/v1/tickets/{}", id))
            .json(&json!({ "assignedTo": uuid::Uuid::new_v4() }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_returns_204_then_404() {
        let harness = harness();
        seed_round_robin_fixture(&harness.users, &harness.tickets).await;

        let listed: serde_json::Value = harness.server.get("/api/v1/tickets").await.json();
        let id = listed["data"][0]["id"].as_i64().unwrap();

        harness
            .server
            .delete(&format!("/api/v1/tickets/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        harness
            .server
            .delete(&format!("/api/v1/tickets/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
