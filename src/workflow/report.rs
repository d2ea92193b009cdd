use tracing::warn;

use crate::context::AppContext;
use crate::domain::ticket::Ticket;
use crate::triage::TopicGroup;

/// One listing attempt bounded by the configured timeout. Any failure is
/// logged and yields an empty list.
pub async fn fetch_tickets(ctx: &AppContext) -> Vec<Ticket> {
    let timeout = ctx.config.listing_timeout;
    match tokio::time::timeout(timeout, ctx.issue_tracker.list_tickets()).await {
        Ok(Ok(tickets)) => tickets,
        Ok(Err(err)) => {
            warn!("ticket listing failed: {err}");
            Vec::new()
        }
        Err(_) => {
            warn!("ticket listing timed out after {timeout:?}");
            Vec::new()
        }
    }
}

pub async fn grouped_tickets(ctx: &AppContext) -> Vec<TopicGroup> {
    let tickets = fetch_tickets(ctx).await;
    ctx.triage.group(tickets)
}
