use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn ticket_changed(&self, ticket: &Ticket) -> AppResult<()>;
}

/// Used when notifications are switched off in the configuration.
pub struct DisabledNotifier;

#[async_trait]
impl NotificationService for DisabledNotifier {
    async fn ticket_changed(&self, ticket: &Ticket) -> AppResult<()> {
        tracing::debug!("notifications disabled, not announcing ticket #{}", ticket.id);
        Ok(())
    }
}

pub fn select_notifier(
    enabled: bool,
    tracker: Arc<dyn NotificationService>,
) -> Arc<dyn NotificationService> {
    if enabled {
        tracker
    } else {
        Arc::new(DisabledNotifier)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use super::*;
    use crate::config::AppConfig;
    use crate::context::AppContext;
    use crate::domain::commit::{Commit, CommitAuthor};
    use crate::domain::ticket::TicketField;
    use crate::infra::git::GitCli;
    use crate::infra::memory::MemoryTracker;
    use crate::workflow::commit::process_commit;

    fn ticket(id: u64) -> Ticket {
        Ticket {
            id,
            ticket_type: "task".to_string(),
            status: "new".to_string(),
            resolution: None,
            remaining_time: Some("1".to_string()),
            outgoing: Vec::new(),
            writable_fields: BTreeSet::from([TicketField::RemainingTime]),
            changed_at: None,
        }
    }

    async fn close_with_notifications(enabled: bool) -> Arc<MemoryTracker> {
        let tracker = Arc::new(MemoryTracker::with_tickets([ticket(2)]));
        let ctx = AppContext::new(
            AppConfig::for_tests(),
            Arc::new(GitCli::new(PathBuf::from("."))),
            tracker.clone(),
            select_notifier(enabled, tracker.clone()),
        );
        let commit = Commit {
            id: "c1".to_string(),
            message: "fixes #2".to_string(),
            author: CommitAuthor {
                name: "dev".to_string(),
                email: None,
            },
        };

        process_commit(&ctx, &commit, "app").await.unwrap();
        tracker
    }

    #[tokio::test]
    async fn disabled_notifier_sends_nothing() {
        let tracker = close_with_notifications(false).await;
        assert_eq!(tracker.saves().len(), 1);
        assert!(tracker.notified().is_empty());
    }

    #[tokio::test]
    async fn enabled_notifications_reach_the_tracker() {
        let tracker = close_with_notifications(true).await;
        assert_eq!(tracker.notified(), vec![2]);
    }
}
