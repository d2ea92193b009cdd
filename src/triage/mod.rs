//! Ticket enrichment and topic grouping.

pub mod classifier;
pub mod enrich;
pub mod grouping;
pub mod rules;
pub mod tags;
pub mod text;

use std::sync::Arc;

use tracing::info;

use crate::domain::category::Category;
use crate::domain::ticket::{Ticket, TicketRequest};
use crate::error::AppResult;
use crate::services::LanguageModelService;

pub use enrich::EnrichmentRecord;
pub use grouping::TopicGroup;
pub use rules::TriageRules;

#[derive(Clone)]
pub struct TriageEngine {
    language_model: Arc<dyn LanguageModelService>,
    rules: Arc<TriageRules>,
}

impl TriageEngine {
    pub fn new(language_model: Arc<dyn LanguageModelService>, rules: TriageRules) -> Self {
        Self {
            language_model,
            rules: Arc::new(rules),
        }
    }

    pub async fn classify(&self, summary: &str) -> Category {
        classifier::classify(self.language_model.as_ref(), &self.rules.keywords, summary).await
    }

    pub async fn generate_tags(&self, summary: &str) -> AppResult<Vec<String>> {
        tags::generate_tags(self.language_model.as_ref(), summary).await
    }

    pub fn resolve_assignee(&self, category: Category) -> &str {
        self.rules.assignments.resolve(category)
    }

    /// Tags, category and assignee for a new request. Fails only when tag
    /// generation fails.
    pub async fn enrich(&self, request: &TicketRequest) -> AppResult<EnrichmentRecord> {
        let tags = self.generate_tags(&request.summary).await?;
        let category = self.classify(&request.summary).await;
        let assignee = self.resolve_assignee(category).to_string();
        info!("classified as {category}, assigned to {assignee}");
        Ok(EnrichmentRecord::new(request, category, tags, assignee))
    }

    pub fn group(&self, tickets: Vec<Ticket>) -> Vec<TopicGroup> {
        grouping::group_tickets(&self.rules.stop_words, tickets)
    }
}
