use crate::cache::ProcessedCommits;
use crate::context::AppContext;
use crate::domain::command::CommandPlan;
use crate::domain::commit::Commit;
use crate::workflow::commit::{CommitOutcome, process_commit};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum CommitReport {
    Applied(CommitOutcome),
    Planned { commit_id: String, plan: CommandPlan },
    Skipped { commit_id: String },
    Failed { commit_id: String, error: String },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub commits: Vec<CommitReport>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.commits
            .iter()
            .filter(|report| matches!(report, CommitReport::Failed { .. }))
            .count()
    }
}

/// Runs each commit in order; one failing commit does not stop the rest.
pub async fn process_commits(
    ctx: &AppContext,
    repository: &str,
    commits: &[Commit],
    mut ledger: Option<&mut ProcessedCommits>,
    options: BatchOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for commit in commits {
        if options.dry_run {
            report.commits.push(CommitReport::Planned {
                commit_id: commit.id.clone(),
                plan: CommandPlan::from_message(&commit.message),
            });
            continue;
        }

        if !options.force
            && ledger
                .as_deref()
                .is_some_and(|ledger| ledger.contains(repository, &commit.id))
        {
            tracing::warn!("commit {} was already processed, skipping", commit.id);
            report.commits.push(CommitReport::Skipped {
                commit_id: commit.id.clone(),
            });
            continue;
        }

        match process_commit(ctx, commit, repository).await {
            Ok(outcome) => {
                if let Some(ledger) = ledger.as_deref_mut() {
                    ledger.insert(repository, &commit.id);
                }
                report.commits.push(CommitReport::Applied(outcome));
            }
            Err(error) => {
                tracing::error!("failed to process commit {}: {error}", commit.id);
                report.commits.push(CommitReport::Failed {
                    commit_id: commit.id.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    report
}
