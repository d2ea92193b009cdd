use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use regex::Regex;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::ticket::{
    CreatedTicket, DeleteOutcome, Ticket, TicketDetails, TicketDraft, TransitionOutcome,
};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const LISTING_LIMIT: u32 = 50;
const TAGS_FIELD: &str = "customfield_10000";
const UNKNOWN_REPORTER: &str = "Unknown";

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("HASHTAG_REGEX: invalid pattern"));

pub struct JiraSettings {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub service_desk_id: Option<String>,
    pub request_type_id: Option<String>,
}

pub struct JiraClient {
    http: Client,
    settings: JiraSettings,
}

impl JiraClient {
    pub fn new(settings: JiraSettings, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http, settings })
    }

    fn api_details(&self) -> AppResult<(String, String)> {
        let domain = self
            .settings
            .domain
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira domain not configured".to_string()))?;
        let email = self
            .settings
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .settings
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((Self::base_url(domain), Self::auth_header(email, token)))
    }

    fn service_desk_id(&self) -> AppResult<&str> {
        self.settings
            .service_desk_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("service desk id not configured".to_string()))
    }

    fn base_url(domain: &str) -> String {
        let domain = domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!("{base_url}/rest/api/3/issue/{}", key.trim())
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{base_url}/browse/{key}")
    }

    async fn read_error(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string())
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<CreatedTicket> {
        let (base_url, auth) = self.api_details()?;
        let service_desk_id = self.service_desk_id()?;
        let request_type_id = self
            .settings
            .request_type_id
            .as_deref()
            .ok_or_else(|| AppError::Configuration("request type id not configured".to_string()))?;

        let body = CreateRequestBody {
            service_desk_id,
            request_type_id,
            request_field_values: RequestFieldValues {
                summary: &draft.summary,
                description: &draft.description,
            },
        };

        let response = self
            .http
            .post(format!("{base_url}/rest/servicedeskapi/request"))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error(response).await;
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        let payload: CreateRequestResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("could not parse Jira response: {err}"))
        })?;

        let url = payload
            .links
            .and_then(|links| links.web)
            .unwrap_or_else(|| Self::browse_url(&base_url, &payload.issue_key));

        Ok(CreatedTicket {
            key: payload.issue_key,
            url: Some(url),
        })
    }

    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        let (base_url, auth) = self.api_details()?;
        let service_desk_id = self.service_desk_id()?;

        info!("calling Jira service desk API");
        let response = self
            .http
            .get(format!("{base_url}/rest/servicedeskapi/request"))
            .query(&[
                ("serviceDeskId", service_desk_id.to_string()),
                ("limit", LISTING_LIMIT.to_string()),
            ])
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AppError::IssueTracker("Jira request timed out".to_string())
                } else {
                    AppError::IssueTracker(format!("Jira API error: {err}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error(response).await;
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        let page: RequestPage = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira JSON response: {err}"))
        })?;
        debug!(count = page.values.len(), "Jira API responded successfully");

        Ok(page.values.into_iter().map(ServiceRequest::into_ticket).collect())
    }

    async fn ticket_details(&self, key: &str) -> AppResult<TicketDetails> {
        let (base_url, auth) = self.api_details()?;
        let response = self
            .http
            .get(Self::issue_endpoint(&base_url, key))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        if response.status() != StatusCode::OK {
            return Err(AppError::IssueTracker(format!("ticket {key} not found")));
        }

        let issue: IssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;
        let description = document_text(&issue.fields.description);
        let tags = extract_hashtags(&description);

        Ok(TicketDetails {
            key: issue.key,
            summary: issue.fields.summary.unwrap_or_default(),
            description,
            tags,
        })
    }

    async fn delete_ticket(&self, key: &str) -> AppResult<DeleteOutcome> {
        let (base_url, auth) = self.api_details()?;
        let response = self
            .http
            .delete(Self::issue_endpoint(&base_url, key))
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(DeleteOutcome::Deleted);
        }
        Ok(DeleteOutcome::Rejected {
            status: status.as_u16(),
            body: Self::read_error(response).await,
        })
    }

    async fn transition_ticket(&self, key: &str, status: &str) -> AppResult<TransitionOutcome> {
        let (base_url, auth) = self.api_details()?;
        let endpoint = format!("{}/transitions", Self::issue_endpoint(&base_url, key));

        let response = self
            .http
            .get(&endpoint)
            .header(AUTHORIZATION, auth.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;
        let listing_status = response.status();
        let body = Self::read_error(response).await;
        let listing = parse_transitions(key, listing_status, &body)?;

        let Some(transition_id) = find_transition(&listing.transitions, status) else {
            return Ok(TransitionOutcome::NotFound);
        };

        let response = self
            .http
            .post(&endpoint)
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&TransitionRequest {
                transition: TransitionRef { id: transition_id },
            })
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        if response.status() == StatusCode::NO_CONTENT {
            Ok(TransitionOutcome::Transitioned)
        } else {
            Ok(TransitionOutcome::Rejected {
                body: Self::read_error(response).await,
            })
        }
    }
}

/// Transitions available on an issue; an unsuccessful lookup means the
/// issue itself could not be read.
fn parse_transitions(key: &str, status: StatusCode, body: &str) -> AppResult<TransitionList> {
    if !status.is_success() {
        return Err(AppError::IssueTracker(format!(
            "could not read transitions for {key} ({status}): {body}"
        )));
    }
    serde_json::from_str(body)
        .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira transitions: {err}")))
}

fn find_transition(transitions: &[Transition], status: &str) -> Option<String> {
    let wanted = status.to_lowercase();
    transitions
        .iter()
        .find(|transition| transition.name.to_lowercase() == wanted)
        .map(|transition| transition.id.clone())
}

/// Hashtag-style tags (`#network`) embedded in free text.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Plain text of a description that is either a string or a rich-text
/// document tree.
fn document_text(value: &Value) -> String {
    fn collect<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
        match value {
            Value::String(text) => out.push(text),
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            Value::Object(map) => {
                if let Some(Value::String(text)) = map.get("text") {
                    out.push(text);
                }
                if let Some(content) = map.get("content") {
                    collect(content, out);
                }
            }
            _ => {}
        }
    }

    let mut pieces = Vec::new();
    collect(value, &mut pieces);
    pieces.join(" ")
}

/// Request field values are strings, lists, or structured values; lists
/// are joined with spaces.
fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequestBody<'a> {
    service_desk_id: &'a str,
    request_type_id: &'a str,
    request_field_values: RequestFieldValues<'a>,
}

#[derive(Serialize)]
struct RequestFieldValues<'a> {
    summary: &'a str,
    description: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequestResponse {
    issue_key: String,
    #[serde(rename = "_links")]
    links: Option<RequestLinks>,
}

#[derive(Deserialize)]
struct RequestLinks {
    web: Option<String>,
}

#[derive(Deserialize)]
struct RequestPage {
    #[serde(default)]
    values: Vec<ServiceRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRequest {
    issue_key: Option<String>,
    key: Option<String>,
    #[serde(default)]
    request_field_values: Vec<FieldValue>,
}

impl ServiceRequest {
    fn field(&self, field_id: &str) -> String {
        self.request_field_values
            .iter()
            .find(|field| field.field_id.as_deref() == Some(field_id))
            .map(|field| field_text(&field.value))
            .unwrap_or_default()
    }

    fn into_ticket(self) -> Ticket {
        let reporter = Some(self.field("reporterName"))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_REPORTER.to_string());
        let raw_tags = self.field(TAGS_FIELD);
        let tags = if raw_tags.is_empty() {
            Vec::new()
        } else {
            raw_tags.split(',').map(str::to_string).collect()
        };

        Ticket {
            summary: self.field("summary"),
            description: self.field("description"),
            reporter,
            tags,
            key: self.issue_key.or(self.key).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    field_id: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: Option<String>,
    #[serde(default)]
    description: Value,
}

#[derive(Deserialize)]
struct TransitionList {
    #[serde(default)]
    transitions: Vec<Transition>,
}

#[derive(Deserialize)]
struct Transition {
    id: String,
    name: String,
}

#[derive(Serialize)]
struct TransitionRequest {
    transition: TransitionRef,
}

#[derive(Serialize)]
struct TransitionRef {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_base_url_from_domain() {
        assert_eq!(
            JiraClient::base_url("acme.atlassian.net/"),
            "https://acme.atlassian.net"
        );
        assert_eq!(
            JiraClient::base_url("http://localhost:8080"),
            "http://localhost:8080"
        );
    }

    #[test]
    fn encodes_basic_auth() {
        assert_eq!(
            JiraClient::auth_header("me@acme.io", "secret"),
            "Basic bWVAYWNtZS5pbzpzZWNyZXQ="
        );
    }

    #[test]
    fn parses_service_desk_page() {
        let page: RequestPage = serde_json::from_str(
            r#"{"values":[
                {"issueKey":"HD-7","requestFieldValues":[
                    {"fieldId":"summary","value":"Printer jammed"},
                    {"fieldId":"description","value":["tray","2"]},
                    {"fieldId":"customfield_10000","value":"printer,hardware"}
                ]},
                {"key":"HD-8","requestFieldValues":[
                    {"fieldId":"reporterName","value":"Dana"}
                ]}
            ]}"#,
        )
        .unwrap();

        let tickets: Vec<Ticket> = page
            .values
            .into_iter()
            .map(ServiceRequest::into_ticket)
            .collect();
        assert_eq!(tickets[0].key, "HD-7");
        assert_eq!(tickets[0].summary, "Printer jammed");
        assert_eq!(tickets[0].description, "tray 2");
        assert_eq!(tickets[0].reporter, "Unknown");
        assert_eq!(tickets[0].tags, vec!["printer", "hardware"]);

        assert_eq!(tickets[1].key, "HD-8");
        assert_eq!(tickets[1].summary, "");
        assert_eq!(tickets[1].reporter, "Dana");
        assert!(tickets[1].tags.is_empty());
    }

    #[test]
    fn serializes_create_request() {
        let body = CreateRequestBody {
            service_desk_id: "3",
            request_type_id: "17",
            request_field_values: RequestFieldValues {
                summary: "VPN down",
                description: "Reporter Name: Dana",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "serviceDeskId": "3",
                "requestTypeId": "17",
                "requestFieldValues": {"summary": "VPN down", "description": "Reporter Name: Dana"}
            })
        );
    }

    #[test]
    fn matches_transition_case_insensitively() {
        let transitions = vec![
            Transition {
                id: "11".to_string(),
                name: "In Progress".to_string(),
            },
            Transition {
                id: "31".to_string(),
                name: "Done".to_string(),
            },
        ];
        assert_eq!(
            find_transition(&transitions, "done"),
            Some("31".to_string())
        );
        assert_eq!(find_transition(&transitions, "Closed"), None);
    }

    #[test]
    fn missing_issue_is_not_a_missing_transition() {
        let body = r#"{"errorMessages":["Issue does not exist"],"errors":{}}"#;
        let result = parse_transitions("HD-404", StatusCode::NOT_FOUND, body);
        assert!(matches!(result, Err(AppError::IssueTracker(message)) if message.contains("404")));

        let listing = parse_transitions(
            "HD-1",
            StatusCode::OK,
            r#"{"transitions":[{"id":"31","name":"Done"}]}"#,
        )
        .unwrap();
        assert_eq!(
            find_transition(&listing.transitions, "DONE"),
            Some("31".to_string())
        );
    }

    #[test]
    fn finds_hashtags_in_rich_text() {
        let description = serde_json::json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Seen on #wifi and"}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "#vpn_gateway."}]}
            ]
        });
        let text = document_text(&description);
        assert_eq!(text, "Seen on #wifi and #vpn_gateway.");
        assert_eq!(extract_hashtags(&text), vec!["#wifi", "#vpn_gateway"]);
        assert_eq!(
            document_text(&serde_json::json!("plain #tag")),
            "plain #tag"
        );
    }
}
