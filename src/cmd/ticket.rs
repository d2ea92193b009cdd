use clap::Args;

use crate::context::AppContext;
use crate::domain::ticket::{DeleteOutcome, TicketRequest, TransitionOutcome};
use crate::error::{AppError, AppResult};
use crate::triage::TopicGroup;
use crate::workflow::{report, ticket};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// One-line summary of the problem.
    #[arg(short, long)]
    pub summary: String,
    /// Longer description of the problem.
    #[arg(short, long)]
    pub description: String,
    /// Reporter name.
    #[arg(short, long)]
    pub name: String,
    /// Reporter email.
    #[arg(short, long)]
    pub email: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Print the groups as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn create(ctx: &AppContext, args: CreateArgs) -> AppResult<()> {
    let request = TicketRequest {
        summary: args.summary,
        description: args.description,
        name: args.name,
        email: args.email,
    };
    let outcome = ticket::create_ticket(ctx, request).await?;

    println!("Ticket {} created.", outcome.ticket.key);
    println!("Issue type: {}", outcome.enrichment.category);
    println!("Assigned to: {}", outcome.enrichment.assignee);
    println!("Tags: {}", outcome.enrichment.tags.join(", "));
    if let Some(url) = &outcome.ticket.url {
        println!("View ticket: {url}");
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, args: ListArgs) -> AppResult<()> {
    let groups = report::grouped_tickets(ctx).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        print!("{}", render_groups(&groups));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, key: &str) -> AppResult<()> {
    let details = ticket::ticket_details(ctx, key).await?;
    println!("{}: {}", details.key, details.summary);
    if !details.tags.is_empty() {
        println!("Tags: {}", details.tags.join(" "));
    }
    println!();
    println!("{}", details.description);
    Ok(())
}

pub async fn delete(ctx: &AppContext, key: &str) -> AppResult<()> {
    match ticket::delete_ticket(ctx, key).await? {
        DeleteOutcome::Deleted => {
            println!("Ticket {key} deleted successfully.");
            Ok(())
        }
        DeleteOutcome::Rejected { status, body } => Err(AppError::IssueTracker(format!(
            "could not delete {key} ({status}): {body}"
        ))),
    }
}

pub async fn transition(ctx: &AppContext, key: &str, status: &str) -> AppResult<()> {
    match ticket::transition_ticket(ctx, key, status).await? {
        TransitionOutcome::Transitioned => {
            println!("Ticket {key} moved to '{status}'.");
            Ok(())
        }
        TransitionOutcome::NotFound => Err(AppError::IssueTracker(format!(
            "transition '{status}' not found for {key}"
        ))),
        TransitionOutcome::Rejected { body } => Err(AppError::IssueTracker(format!(
            "transition of {key} rejected: {body}"
        ))),
    }
}

fn render_groups(groups: &[TopicGroup]) -> String {
    if groups.is_empty() {
        return "No tickets found.\n".to_string();
    }

    let mut out = String::new();
    for group in groups {
        out.push_str(&format!(
            "[{}] {} ({} tickets)\n",
            group.group_key, group.main_issue, group.total_tickets
        ));
        for ticket in &group.tickets {
            out.push_str(&format!(
                "  {:<10} {} ({})\n",
                ticket.key, ticket.summary, ticket.reporter
            ));
        }
    }
    out
}
