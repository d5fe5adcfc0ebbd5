use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, NotificationService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub notifier: Arc<dyn NotificationService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            config,
            version_control,
            issue_tracker,
            notifier,
        }
    }
}
