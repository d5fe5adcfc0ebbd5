use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::context::AppContext;
use crate::domain::commit::PushPayload;
use crate::error::{AppError, AppResult};
use crate::workflow::batch::BatchOptions;

#[derive(Debug, Clone)]
pub struct PushCommandArgs {
    pub payload: Option<PathBuf>,
    pub options: BatchOptions,
}

pub async fn run(ctx: &AppContext, args: PushCommandArgs) -> AppResult<()> {
    let raw = match &args.payload {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let payload = parse_payload(&raw)?;
    tracing::debug!(
        "push to {} with {} commits",
        payload.repository.name,
        payload.commits.len()
    );

    super::run_batch(ctx, &payload.repository.name, &payload.commits, args.options).await
}

fn parse_payload(raw: &str) -> AppResult<PushPayload> {
    serde_json::from_str(raw).map_err(|err| AppError::Payload(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_malformed_payload() {
        let result = parse_payload(r#"{"commits": []}"#);
        assert!(matches!(result, Err(AppError::Payload(message)) if message.contains("repository")));
    }

    #[test]
    fn accepts_payload_without_commits() {
        let payload = parse_payload(r#"{"repository": {"name": "app"}}"#).unwrap();
        assert!(payload.commits.is_empty());
    }
}
