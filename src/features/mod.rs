pub mod tickets;
pub mod users;
