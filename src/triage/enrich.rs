use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::ticket::TicketRequest;

/// Metadata inferred for a new request, embedded into its description.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentRecord {
    pub category: Category,
    pub tags: Vec<String>,
    pub assignee: String,
    pub formatted_description: String,
}

impl EnrichmentRecord {
    pub fn new(
        request: &TicketRequest,
        category: Category,
        tags: Vec<String>,
        assignee: String,
    ) -> Self {
        let formatted_description = format_description(request, category, &tags, &assignee);
        Self {
            category,
            tags,
            assignee,
            formatted_description,
        }
    }
}

pub fn format_description(
    request: &TicketRequest,
    category: Category,
    tags: &[String],
    assignee: &str,
) -> String {
    format!(
        "Reporter Name: {}\n\
         Reporter Email: {}\n\
         Issue Type: {}\n\
         Assigned To: {}\n\
         AI-Generated Keywords/Tags: {}\n\
         Issue Description: {}",
        request.name,
        request.email,
        category,
        assignee,
        tags.join(", "),
        request.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_one_field_per_line() {
        let request = TicketRequest {
            summary: "VPN drops".to_string(),
            description: "Drops every hour".to_string(),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
        };
        let record = EnrichmentRecord::new(
            &request,
            Category::NetworkIssue,
            vec!["vpn".to_string(), "network".to_string()],
            "Arindam Sen(Network Engineer)".to_string(),
        );
        assert_eq!(
            record.formatted_description,
            "Reporter Name: Dana\n\
             Reporter Email: dana@example.com\n\
             Issue Type: Network Issue\n\
             Assigned To: Arindam Sen(Network Engineer)\n\
             AI-Generated Keywords/Tags: vpn, network\n\
             Issue Description: Drops every hour"
        );
    }
}
