use tracing::{debug, error, warn};

use crate::domain::category::Category;
use crate::error::AppError;
use crate::services::LanguageModelService;
use crate::triage::rules::KeywordRules;

fn classification_prompt(summary: &str) -> String {
    format!(
        "You are an IT support ticket classifier.\n\n\
         Classify the ticket into EXACTLY ONE of these categories:\n\n\
         Network Issue\nSecurity Issue\nHardware Issue\nAccess Issue\n\n\
         Return ONLY the category name.\nNo explanation.\n\n\
         Summary: {summary}\nCategory:"
    )
}

/// Picks exactly one category for a summary. Never fails: an unusable model
/// reply falls back to the keyword table, a failed call to the safety net.
pub async fn classify(
    model: &dyn LanguageModelService,
    rules: &KeywordRules,
    summary: &str,
) -> Category {
    if summary.is_empty() {
        return Category::NetworkIssue;
    }

    match model.infer(&classification_prompt(summary)).await {
        Ok(reply) if reply.trim().is_empty() => {
            warn!("language model returned an empty classification, using keyword rules");
            rules.classify(summary)
        }
        Ok(reply) => {
            debug!(reply = reply.trim(), "language model classification");
            Category::from_inference(&reply).unwrap_or_else(|| rules.classify(summary))
        }
        Err(AppError::InferenceUnavailable(reason)) => {
            warn!("inference unavailable ({reason}), using keyword rules");
            rules.classify(summary)
        }
        Err(err) => {
            error!("classification error: {err}");
            rules.safety_net(summary)
        }
    }
}
