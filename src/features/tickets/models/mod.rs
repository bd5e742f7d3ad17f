mod ticket;

pub use ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};
