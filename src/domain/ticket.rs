use serde::Serialize;

use crate::error::{AppError, AppResult};

/// A service-desk request as read back from the ticketing platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub reporter: String,
    pub tags: Vec<String>,
}

/// What a user submits when raising a new request.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    pub summary: String,
    pub description: String,
    pub name: String,
    pub email: String,
}

impl TicketRequest {
    pub fn validate(&self) -> AppResult<()> {
        let fields = [
            ("summary", &self.summary),
            ("description", &self.description),
            ("name", &self.name),
            ("email", &self.email),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// The payload handed to the issue tracker once enrichment is done.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreatedTicket {
    pub key: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TicketDetails {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Transitioned,
    NotFound,
    Rejected { body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TicketRequest {
        TicketRequest {
            summary: "Printer jammed".to_string(),
            description: "Third floor printer".to_string(),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_first_missing_field() {
        let mut req = request();
        req.name = "  ".to_string();
        req.email = String::new();
        match req.validate() {
            Err(AppError::Validation(message)) => assert_eq!(message, "name is required"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
