use async_trait::async_trait;

use crate::domain::ticket::{
    CreatedTicket, DeleteOutcome, Ticket, TicketDetails, TicketDraft, TransitionOutcome,
};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<CreatedTicket>;
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>>;
    async fn ticket_details(&self, key: &str) -> AppResult<TicketDetails>;
    async fn delete_ticket(&self, key: &str) -> AppResult<DeleteOutcome>;
    async fn transition_ticket(&self, key: &str, status: &str) -> AppResult<TransitionOutcome>;
}
