pub mod command;
pub mod commit;
pub mod ticket;
