pub mod commit;
pub mod config;
pub mod parse;
pub mod push;

use crate::cache::ProcessedCommits;
use crate::context::AppContext;
use crate::domain::commit::Commit;
use crate::error::{AppError, AppResult};
use crate::workflow::batch::{BatchOptions, BatchReport, CommitReport, process_commits};

/// Shared tail of `push` and `commit`: run the batch, persist the ledger, report.
async fn run_batch(
    ctx: &AppContext,
    repository: &str,
    commits: &[Commit],
    options: BatchOptions,
) -> AppResult<()> {
    let mut ledger = if options.dry_run {
        None
    } else {
        Some(ProcessedCommits::load()?)
    };

    let report = process_commits(ctx, repository, commits, ledger.as_mut(), options).await;

    if let Some(ledger) = &ledger {
        ledger.save()?;
        tracing::debug!("commit ledger written to {}", ledger.path().display());
    }

    print_report(&report);

    match report.failures() {
        0 => Ok(()),
        failed => Err(AppError::CommitsFailed {
            failed,
            total: report.commits.len(),
        }),
    }
}

fn print_report(report: &BatchReport) {
    for commit in &report.commits {
        match commit {
            CommitReport::Applied(outcome) => {
                if outcome.tickets.is_empty() {
                    println!("{}: no ticket commands", outcome.commit_id);
                }
                for ticket in &outcome.tickets {
                    let actions = ticket
                        .actions
                        .iter()
                        .map(|action| action.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!(
                        "{}: #{} {actions} -> {}",
                        outcome.commit_id, ticket.id, ticket.status
                    );
                }
            }
            CommitReport::Planned { commit_id, plan } => {
                print!("{commit_id}:\n{plan}");
            }
            CommitReport::Skipped { commit_id } => {
                println!("{commit_id}: already processed, skipped");
            }
            CommitReport::Failed { commit_id, error } => {
                println!("{commit_id}: failed: {error}");
            }
        }
    }
}
