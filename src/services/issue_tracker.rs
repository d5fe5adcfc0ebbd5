use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn get_ticket(&self, id: TicketId) -> AppResult<Ticket>;
    /// Persists the in-memory ticket and returns the tracker's view of it.
    async fn save_ticket(&self, ticket: &Ticket, author: &str, comment: &str) -> AppResult<Ticket>;
}
