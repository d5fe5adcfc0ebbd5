use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// The subset of a GitHub push webhook body the hook reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PushPayload {
    pub repository: Repository,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl Commit {
    pub fn changeset_note(&self, repository: &str) -> String {
        format!(
            "Changeset: [/changeset/{repository}/commit/{id} {repository}/{id}]",
            id = self.id
        )
    }

    /// Comment attached to every ticket the commit touches.
    pub fn ticket_comment(&self, repository: &str) -> String {
        format!("{} \n {}", self.message, self.changeset_note(repository))
    }
}
