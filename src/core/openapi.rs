use utoipa::{Modify, OpenApi};

use crate::features::tickets::{dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ErrorResponse, PageMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::create_user,
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        // Tickets
        tickets_handlers::create_ticket,
        tickets_handlers::list_tickets,
        tickets_handlers::get_ticket,
        tickets_handlers::update_ticket,
        tickets_handlers::delete_ticket,
    ),
    components(
        schemas(
            // Shared
            PageMeta,
            ErrorResponse,
            // Users
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            users_dtos::UserResponseDto,
            users_dtos::UserListResponse,
            users_dtos::UserSortBy,
            // Tickets
            tickets_models::TicketStatus,
            tickets_models::TicketPriority,
            tickets_dtos::CreateTicketDto,
            tickets_dtos::UpdateTicketDto,
            tickets_dtos::TicketResponseDto,
            tickets_dtos::TicketListMeta,
            tickets_dtos::TicketListResponse,
            tickets_dtos::StatusCounts,
            tickets_dtos::TicketSortBy,
        )
    ),
    tags(
        (name = "tickets", description = "Ticket management endpoints with status counts"),
        (name = "users", description = "User management endpoints"),
    ),
    info(
        title = "Ticket Sync API",
        version = "0.1.0",
        description = "API documentation for the Ticket Sync platform",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
