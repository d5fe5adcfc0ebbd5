use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::commit::{Commit, CommitAuthor};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

const COMMIT_FORMAT: &str = "--format=%H%x00%an%x00%ae%x00%B";

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn git(&self, args: &[&str]) -> AppResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn read_commit(&self, revision: &str) -> AppResult<Commit> {
        if revision.trim().is_empty() {
            return Err(AppError::VersionControl(
                "revision must not be empty".to_string(),
            ));
        }
        let raw = self.git(&["show", "-s", COMMIT_FORMAT, revision]).await?;
        parse_show_output(&raw)
    }

    async fn repository_name(&self) -> AppResult<String> {
        let toplevel = self.git(&["rev-parse", "--show-toplevel"]).await?;
        Path::new(toplevel.trim())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::VersionControl(format!(
                    "cannot derive a repository name from '{}'",
                    toplevel.trim()
                ))
            })
    }
}

fn parse_show_output(raw: &str) -> AppResult<Commit> {
    let mut parts = raw.splitn(4, '\0');
    let (Some(id), Some(name), Some(email), Some(message)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::VersionControl(
            "unexpected `git show` output".to_string(),
        ));
    };

    let email = email.trim();
    Ok(Commit {
        id: id.trim().to_string(),
        message: message.trim_end().to_string(),
        author: CommitAuthor {
            name: name.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
        },
    })
}
