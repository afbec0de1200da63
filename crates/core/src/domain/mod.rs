pub mod lease;
pub mod quote;
pub mod ticket;
