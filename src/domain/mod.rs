pub mod category;
pub mod ticket;
