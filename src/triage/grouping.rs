use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::domain::ticket::Ticket;
use crate::triage::text::{StopWords, tokenize};

const UNKNOWN_KEYWORD: &str = "unknown";
const NO_SUMMARY: &str = "No Summary";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGroup {
    pub group_key: String,
    pub main_issue: String,
    pub total_tickets: usize,
    pub tickets: Vec<Ticket>,
}

/// First token left after stop-word removal. Falls back to the first raw
/// token, then to `"unknown"` for summaries without any token.
pub fn dominant_keyword(stop_words: &StopWords, summary: &str) -> String {
    let tokens = tokenize(summary);
    stop_words
        .filter(&tokens)
        .first()
        .map(|token| token.to_string())
        .or_else(|| tokens.first().cloned())
        .unwrap_or_else(|| UNKNOWN_KEYWORD.to_string())
}

/// Buckets tickets by dominant keyword and orders the buckets largest
/// first. Equal-sized buckets keep the order their first ticket appeared in.
pub fn group_tickets(stop_words: &StopWords, tickets: Vec<Ticket>) -> Vec<TopicGroup> {
    let total = tickets.len();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<Ticket>)> = Vec::new();

    for ticket in tickets {
        let keyword = dominant_keyword(stop_words, &ticket.summary);
        match index.get(&keyword) {
            Some(&position) => buckets[position].1.push(ticket),
            None => {
                index.insert(keyword.clone(), buckets.len());
                buckets.push((keyword, vec![ticket]));
            }
        }
    }

    // `sort_by` is stable, which keeps first-seen order among ties.
    buckets.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let groups: Vec<TopicGroup> = buckets
        .into_iter()
        .map(|(group_key, tickets)| {
            let main_issue = tickets
                .first()
                .map(|ticket| ticket.summary.as_str())
                .filter(|summary| !summary.is_empty())
                .unwrap_or(NO_SUMMARY)
                .to_string();
            TopicGroup {
                group_key,
                main_issue,
                total_tickets: tickets.len(),
                tickets,
            }
        })
        .collect();

    info!("Total tickets: {total}");
    info!("Total groups formed: {}", groups.len());

    groups
}
