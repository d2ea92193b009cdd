use tracing::info;

use crate::context::AppContext;
use crate::domain::ticket::{
    CreatedTicket, DeleteOutcome, TicketDetails, TicketDraft, TicketRequest, TransitionOutcome,
};
use crate::error::{AppError, AppResult};
use crate::triage::EnrichmentRecord;

pub struct IntakeOutcome {
    pub ticket: CreatedTicket,
    pub enrichment: EnrichmentRecord,
}

pub async fn create_ticket(ctx: &AppContext, request: TicketRequest) -> AppResult<IntakeOutcome> {
    request.validate()?;

    let enrichment = ctx.triage.enrich(&request).await?;
    let draft = TicketDraft {
        summary: request.summary.clone(),
        description: enrichment.formatted_description.clone(),
    };

    let ticket = ctx.issue_tracker.create_ticket(draft).await?;
    info!("created {} ({})", ticket.key, enrichment.category);

    Ok(IntakeOutcome { ticket, enrichment })
}

pub async fn ticket_details(ctx: &AppContext, key: &str) -> AppResult<TicketDetails> {
    ctx.issue_tracker.ticket_details(key).await
}

pub async fn delete_ticket(ctx: &AppContext, key: &str) -> AppResult<DeleteOutcome> {
    ctx.issue_tracker.delete_ticket(key).await
}

pub async fn transition_ticket(
    ctx: &AppContext,
    key: &str,
    status: &str,
) -> AppResult<TransitionOutcome> {
    let status = status.trim();
    if status.is_empty() {
        return Err(AppError::Validation("status is required".to_string()));
    }
    ctx.issue_tracker.transition_ticket(key, status).await
}
