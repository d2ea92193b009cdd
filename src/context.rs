use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::IssueTrackerService;
use crate::triage::TriageEngine;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub triage: TriageEngine,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        triage: TriageEngine,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            triage,
        }
    }
}
