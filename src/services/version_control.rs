use async_trait::async_trait;

use crate::domain::commit::Commit;
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    async fn read_commit(&self, revision: &str) -> AppResult<Commit>;
    async fn repository_name(&self) -> AppResult<String>;
}
