pub mod batch;
pub mod commit;
pub mod handlers;
