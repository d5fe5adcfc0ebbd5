use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TicketId = u64;

pub const RESOLUTION_FIXED: &str = "fixed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
    Status,
    Resolution,
    RemainingTime,
}

impl TicketField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketField::Status => "status",
            TicketField::Resolution => "resolution",
            TicketField::RemainingTime => "remaining_time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedTicket {
    pub id: TicketId,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub status: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub remaining_time: Option<String>,
    #[serde(default)]
    pub outgoing: Vec<LinkedTicket>,
    #[serde(default)]
    pub writable_fields: BTreeSet<TicketField>,
    #[serde(default)]
    pub changed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Workflow fields are always writable; `remaining_time` only on task-like tickets.
    pub fn is_writeable_field(&self, field: TicketField) -> bool {
        match field {
            TicketField::Status | TicketField::Resolution => true,
            TicketField::RemainingTime => self.writable_fields.contains(&field),
        }
    }

    /// Writes `value` if the tracker allows it; returns whether it was written.
    pub fn set_field(&mut self, field: TicketField, value: &str) -> bool {
        if !self.is_writeable_field(field) {
            tracing::debug!(
                "ticket #{}: field '{}' is not writable, leaving it unchanged",
                self.id,
                field.as_str()
            );
            return false;
        }
        let value = value.to_string();
        match field {
            TicketField::Status => self.status = value,
            TicketField::Resolution => self.resolution = Some(value),
            TicketField::RemainingTime => self.remaining_time = Some(value),
        }
        true
    }

    pub fn open_links<'a>(&'a self, closed_status: &'a str) -> impl Iterator<Item = &'a LinkedTicket> {
        self.outgoing
            .iter()
            .filter(move |linked| linked.status != closed_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> Ticket {
        Ticket {
            id: 4,
            ticket_type: "story".to_string(),
            status: "new".to_string(),
            resolution: None,
            remaining_time: None,
            outgoing: vec![
                LinkedTicket {
                    id: 5,
                    status: "closed".to_string(),
                },
                LinkedTicket {
                    id: 6,
                    status: "accepted".to_string(),
                },
            ],
            writable_fields: BTreeSet::from([TicketField::Status]),
            changed_at: None,
        }
    }

    #[test]
    fn refuses_remaining_time_unless_listed() {
        let mut ticket = story();
        assert!(!ticket.set_field(TicketField::RemainingTime, "0"));
        assert_eq!(ticket.remaining_time, None);
        assert!(ticket.set_field(TicketField::Resolution, RESOLUTION_FIXED));
        assert_eq!(ticket.resolution.as_deref(), Some(RESOLUTION_FIXED));
    }

    #[test]
    fn workflow_fields_are_writable_without_a_field_list() {
        let ticket: Ticket =
            serde_json::from_str(r#"{"id": 3, "type": "story", "status": "new"}"#).unwrap();
        assert!(ticket.writable_fields.is_empty());
        assert!(ticket.is_writeable_field(TicketField::Status));
        assert!(ticket.is_writeable_field(TicketField::Resolution));
        assert!(!ticket.is_writeable_field(TicketField::RemainingTime));
    }

    #[test]
    fn lists_links_that_are_still_open() {
        let ticket = story();
        let open = ticket.open_links("closed").map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(open, vec![6]);
    }

    #[test]
    fn deserializes_tracker_json() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"id": 9, "type": "task", "status": "assigned",
                "remaining_time": "4", "writable_fields": ["status", "resolution", "remaining_time"]}"#,
        )
        .unwrap();
        assert_eq!(ticket.ticket_type, "task");
        assert!(ticket.is_writeable_field(TicketField::RemainingTime));
        assert!(ticket.outgoing.is_empty());
    }
}
