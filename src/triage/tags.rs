use crate::error::AppResult;
use crate::services::LanguageModelService;

const DEFAULT_TAG: &str = "general";

fn tagging_prompt(summary: &str) -> String {
    format!(
        "Read the following Jira ticket summary and suggest 2-5 concise problem tags, \
         separated by commas:\n\nSummary: {summary}\nTags:"
    )
}

/// Splits a comma-separated reply into lowercase tags, dropping blanks.
pub fn parse_tags(reply: &str) -> Vec<String> {
    let tags: Vec<String> = reply
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect();

    if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    }
}

/// Unlike classification, a failed inference call is returned to the caller.
pub async fn generate_tags(
    model: &dyn LanguageModelService,
    summary: &str,
) -> AppResult<Vec<String>> {
    if summary.is_empty() {
        return Ok(vec![DEFAULT_TAG.to_string()]);
    }
    let reply = model.infer(&tagging_prompt(summary)).await?;
    Ok(parse_tags(&reply))
}
