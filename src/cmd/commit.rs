use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::batch::BatchOptions;

#[derive(Debug, Clone)]
pub struct CommitCommandArgs {
    pub revision: String,
    pub repository: Option<String>,
    pub options: BatchOptions,
}

pub async fn run(ctx: &AppContext, args: CommitCommandArgs) -> AppResult<()> {
    let commit = ctx.version_control.read_commit(&args.revision).await?;
    let repository = match args.repository {
        Some(name) => name,
        None => ctx.version_control.repository_name().await?,
    };

    super::run_batch(ctx, &repository, std::slice::from_ref(&commit), args.options).await
}
