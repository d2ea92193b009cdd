use async_trait::async_trait;

use crate::error::AppResult;

/// Free-text inference. Implementations report an unconfigured or
/// unreachable backend as `AppError::InferenceUnavailable`.
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn infer(&self, prompt: &str) -> AppResult<String>;
}
