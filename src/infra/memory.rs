use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, NotificationService};

#[derive(Debug, Clone, PartialEq)]
pub struct SavedTicket {
    pub ticket: Ticket,
    pub author: String,
    pub comment: String,
}

/// Tracker double that keeps tickets in memory and records every call.
#[derive(Default)]
pub struct MemoryTracker {
    tickets: Mutex<BTreeMap<TicketId, Ticket>>,
    saves: Mutex<Vec<SavedTicket>>,
    notified: Mutex<Vec<TicketId>>,
}

impl MemoryTracker {
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let tracker = Self::default();
        if let Ok(mut store) = tracker.tickets.lock() {
            store.extend(tickets.into_iter().map(|ticket| (ticket.id, ticket)));
        }
        tracker
    }

    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.lock().ok()?.get(&id).cloned()
    }

    pub fn saves(&self) -> Vec<SavedTicket> {
        self.saves.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn notified(&self) -> Vec<TicketId> {
        self.notified.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

fn poisoned() -> AppError {
    AppError::IssueTracker("memory tracker lock poisoned".to_string())
}

#[async_trait]
impl IssueTrackerService for MemoryTracker {
    async fn get_ticket(&self, id: TicketId) -> AppResult<Ticket> {
        self.tickets
            .lock()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::IssueTracker(format!("ticket #{id} does not exist")))
    }

    async fn save_ticket(&self, ticket: &Ticket, author: &str, comment: &str) -> AppResult<Ticket> {
        let mut stored = ticket.clone();
        stored.changed_at = Some(Utc::now());
        self.tickets
            .lock()
            .map_err(|_| poisoned())?
            .insert(stored.id, stored.clone());
        self.saves.lock().map_err(|_| poisoned())?.push(SavedTicket {
            ticket: stored.clone(),
            author: author.to_string(),
            comment: comment.to_string(),
        });
        Ok(stored)
    }
}

#[async_trait]
impl NotificationService for MemoryTracker {
    async fn ticket_changed(&self, ticket: &Ticket) -> AppResult<()> {
        self.notified.lock().map_err(|_| poisoned())?.push(ticket.id);
        Ok(())
    }
}
