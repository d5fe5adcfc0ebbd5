pub mod issue_tracker;
pub mod notifier;
pub mod version_control;

pub use issue_tracker::IssueTrackerService;
pub use notifier::{NotificationService, select_notifier};
pub use version_control::VersionControlService;
