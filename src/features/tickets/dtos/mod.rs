mod ticket_dto;

pub use ticket_dto::{
    CreateTicketDto, StatusCounts, TicketListMeta, TicketListResponse, TicketQueryParams,
    TicketResponseDto, TicketSortBy, UpdateTicketDto,
};
