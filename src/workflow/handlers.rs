use crate::domain::command::Action;
use crate::domain::ticket::{RESOLUTION_FIXED, Ticket, TicketField};

pub fn apply(action: Action, ticket: &mut Ticket, close_status: &str) {
    match action {
        Action::Close => close_ticket(ticket, close_status),
        Action::Reference => reference_ticket(ticket),
    }
}

/// Tasks close outright; containers close once every outgoing link is closed.
pub fn close_ticket(ticket: &mut Ticket, close_status: &str) {
    if ticket.is_writeable_field(TicketField::RemainingTime) {
        ticket.set_field(TicketField::Status, close_status);
        ticket.set_field(TicketField::Resolution, RESOLUTION_FIXED);
        ticket.set_field(TicketField::RemainingTime, "0");
        return;
    }

    if let Some(open) = ticket.open_links(close_status).next() {
        tracing::info!(
            "The ticket(#{}) of type: '{}' has still some open dependencies (#{} is {})... can't close it!",
            ticket.id,
            ticket.ticket_type,
            open.id,
            open.status
        );
        return;
    }

    ticket.set_field(TicketField::Status, close_status);
    ticket.set_field(TicketField::Resolution, RESOLUTION_FIXED);
}

/// The commit is attached as a comment on save; nothing else changes.
pub fn reference_ticket(_ticket: &mut Ticket) {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::ticket::LinkedTicket;

    fn ticket(ticket_type: &str, writable: &[TicketField], outgoing: &[(u64, &str)]) -> Ticket {
        Ticket {
            id: 1,
            ticket_type: ticket_type.to_string(),
            status: "assigned".to_string(),
            resolution: None,
            remaining_time: Some("3".to_string()),
            outgoing: outgoing
                .iter()
                .map(|(id, status)| LinkedTicket {
                    id: *id,
                    status: status.to_string(),
                })
                .collect(),
            writable_fields: writable.iter().copied().collect::<BTreeSet<_>>(),
            changed_at: None,
        }
    }

    #[test]
    fn closes_task_unconditionally() {
        let mut task = ticket(
            "task",
            &[
                TicketField::Status,
                TicketField::Resolution,
                TicketField::RemainingTime,
            ],
            &[(2, "new")],
        );
        close_ticket(&mut task, "closed");
        assert_eq!(task.status, "closed");
        assert_eq!(task.resolution.as_deref(), Some("fixed"));
        assert_eq!(task.remaining_time.as_deref(), Some("0"));
    }

    #[test]
    fn keeps_story_open_while_a_link_is_open() {
        let mut story = ticket(
            "story",
            &[TicketField::Status, TicketField::Resolution],
            &[(2, "closed"), (3, "accepted")],
        );
        close_ticket(&mut story, "closed");
        assert_eq!(story.status, "assigned");
        assert_eq!(story.resolution, None);
    }

    #[test]
    fn closes_story_once_links_are_closed() {
        let mut story = ticket(
            "story",
            &[TicketField::Status, TicketField::Resolution],
            &[(2, "closed"), (3, "closed")],
        );
        close_ticket(&mut story, "closed");
        assert_eq!(story.status, "closed");
        assert_eq!(story.resolution.as_deref(), Some("fixed"));
        assert_eq!(story.remaining_time.as_deref(), Some("3"));
    }

    #[test]
    fn closes_story_without_links() {
        let mut story = ticket("requirement", &[], &[]);
        close_ticket(&mut story, "done");
        assert_eq!(story.status, "done");
        assert_eq!(story.resolution.as_deref(), Some("fixed"));
    }

    #[test]
    fn closes_story_fetched_without_field_list() {
        let mut story: Ticket =
            serde_json::from_str(r#"{"id": 3, "type": "story", "status": "new"}"#).unwrap();
        close_ticket(&mut story, "closed");
        assert_eq!(story.status, "closed");
        assert_eq!(story.resolution.as_deref(), Some("fixed"));
        assert_eq!(story.remaining_time, None);
    }

    #[test]
    fn closes_task_listing_only_remaining_time() {
        let mut task: Ticket = serde_json::from_str(
            r#"{"id": 4, "type": "task", "status": "assigned",
                "remaining_time": "5", "writable_fields": ["remaining_time"],
                "outgoing": [{"id": 9, "status": "new"}]}"#,
        )
        .unwrap();
        close_ticket(&mut task, "closed");
        assert_eq!(task.status, "closed");
        assert_eq!(task.resolution.as_deref(), Some("fixed"));
        assert_eq!(task.remaining_time.as_deref(), Some("0"));
    }

    #[test]
    fn reference_leaves_ticket_untouched() {
        let mut task = ticket("task", &[TicketField::Status], &[]);
        let before = task.clone();
        apply(Action::Reference, &mut task, "closed");
        assert_eq!(task, before);
    }
}
