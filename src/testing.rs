use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ticket::{
    CreatedTicket, DeleteOutcome, Ticket, TicketDetails, TicketDraft, TransitionOutcome,
};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, LanguageModelService};

enum Script {
    Reply(String),
    Unavailable,
    Failing,
}

/// Language model double that answers every prompt the same way.
pub struct ScriptedModel {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn unavailable() -> Self {
        Self::new(Script::Unavailable)
    }

    pub fn failing() -> Self {
        Self::new(Script::Failing)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelService for ScriptedModel {
    async fn infer(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Unavailable => Err(AppError::InferenceUnavailable(
                "no API key configured".to_string(),
            )),
            Script::Failing => Err(AppError::LanguageModel(
                "model responded with 500".to_string(),
            )),
        }
    }
}

pub fn ticket(key: &str, summary: &str) -> Ticket {
    Ticket {
        key: key.to_string(),
        summary: summary.to_string(),
        description: String::new(),
        reporter: "Unknown".to_string(),
        tags: Vec::new(),
    }
}

/// In-memory issue tracker.
#[derive(Default)]
pub struct MemoryTracker {
    pub tickets: Vec<Ticket>,
    pub transitions: Vec<String>,
    pub list_delay: Option<Duration>,
    pub fail_listing: bool,
    pub created: Mutex<Vec<TicketDraft>>,
}

#[async_trait]
impl IssueTrackerService for MemoryTracker {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<CreatedTicket> {
        let mut created = self.created.lock().unwrap();
        created.push(draft);
        Ok(CreatedTicket {
            key: format!("HD-{}", created.len()),
            url: None,
        })
    }

    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_listing {
            return Err(AppError::IssueTracker("connection refused".to_string()));
        }
        Ok(self.tickets.clone())
    }

    async fn ticket_details(&self, key: &str) -> AppResult<TicketDetails> {
        self.tickets
            .iter()
            .find(|ticket| ticket.key == key)
            .map(|ticket| TicketDetails {
                key: ticket.key.clone(),
                summary: ticket.summary.clone(),
                description: ticket.description.clone(),
                tags: ticket.tags.clone(),
            })
            .ok_or_else(|| AppError::IssueTracker("ticket not found".to_string()))
    }

    async fn delete_ticket(&self, key: &str) -> AppResult<DeleteOutcome> {
        if self.tickets.iter().any(|ticket| ticket.key == key) {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Rejected {
                status: 404,
                body: "Issue does not exist".to_string(),
            })
        }
    }

    async fn transition_ticket(&self, _key: &str, status: &str) -> AppResult<TransitionOutcome> {
        if self
            .transitions
            .iter()
            .any(|name| name.eq_ignore_ascii_case(status))
        {
            Ok(TransitionOutcome::Transitioned)
        } else {
            Ok(TransitionOutcome::NotFound)
        }
    }
}
