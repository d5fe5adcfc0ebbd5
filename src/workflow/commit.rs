use crate::context::AppContext;
use crate::domain::command::{Action, CommandPlan};
use crate::domain::commit::Commit;
use crate::domain::ticket::TicketId;
use crate::error::AppResult;
use crate::workflow::handlers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketChange {
    pub id: TicketId,
    pub actions: Vec<Action>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub commit_id: String,
    pub tickets: Vec<TicketChange>,
}

/// Applies every ticket command found in `commit` and saves each ticket once.
pub async fn process_commit(
    ctx: &AppContext,
    commit: &Commit,
    repository: &str,
) -> AppResult<CommitOutcome> {
    tracing::debug!(
        "processing commit {} by {} <{}>: {}",
        commit.id,
        commit.author.name,
        commit.author.email.as_deref().unwrap_or("-"),
        commit.message
    );

    let plan = CommandPlan::from_message(&commit.message);
    let comment = commit.ticket_comment(repository);
    let close_status = ctx.config.close_status.as_str();
    let mut tickets = Vec::with_capacity(plan.len());

    for (id, actions) in plan.iter() {
        let mut ticket = ctx.issue_tracker.get_ticket(id).await?;
        for action in actions {
            handlers::apply(*action, &mut ticket, close_status);
        }

        let saved = ctx
            .issue_tracker
            .save_ticket(&ticket, &commit.author.name, &comment)
            .await?;
        ctx.notifier.ticket_changed(&saved).await?;

        tracing::info!("updated ticket #{id} ({}) from commit {}", saved.status, commit.id);
        tickets.push(TicketChange {
            id,
            actions: actions.to_vec(),
            status: saved.status,
        });
    }

    Ok(CommitOutcome {
        commit_id: commit.id.clone(),
        tickets,
    })
}
