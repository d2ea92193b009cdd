use std::collections::HashMap;

use crate::domain::category::Category;
use crate::triage::text::StopWords;

#[rustfmt::skip]
const HARDWARE_KEYWORDS: &[&str] = &[
    "laptop", "desktop", "printer", "keyboard", "mouse", "monitor", "screen", "display",
    "speaker", "battery", "charger", "power", "ram", "ssd", "broken", "damaged", "not working",
    "overheating",
];

#[rustfmt::skip]
const NETWORK_KEYWORDS: &[&str] = &[
    "vpn", "network", "internet", "wifi", "lan", "router", "switch", "dns", "port", "connection",
    "connectivity", "timeout", "server down",
];

#[rustfmt::skip]
const ACCESS_KEYWORDS: &[&str] = &[
    "password", "login", "access", "permission", "account", "authentication", "authorization",
    "locked", "reset", "otp", "mfa", "2fa",
];

const SAFETY_NET_HARDWARE: &[&str] = &["monitor", "broken"];

const DEFAULT_ASSIGNEE: &str = "Sayan Roy";

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| word.to_string()).collect()
}

fn mentions_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

/// Keyword tables used when the language model cannot settle a category.
/// Matching is by substring on the lowercased summary.
#[derive(Debug, Clone)]
pub struct KeywordRules {
    pub hardware: Vec<String>,
    pub network: Vec<String>,
    pub access: Vec<String>,
    pub safety_net_hardware: Vec<String>,
}

impl KeywordRules {
    /// Full rule table: hardware, then network, then access, otherwise security.
    pub fn classify(&self, summary: &str) -> Category {
        let lowered = summary.to_lowercase();
        if mentions_any(&lowered, &self.hardware) {
            Category::HardwareIssue
        } else if mentions_any(&lowered, &self.network) {
            Category::NetworkIssue
        } else if mentions_any(&lowered, &self.access) {
            Category::AccessIssue
        } else {
            Category::SecurityIssue
        }
    }

    /// Last resort after a failed inference call.
    pub fn safety_net(&self, summary: &str) -> Category {
        if mentions_any(&summary.to_lowercase(), &self.safety_net_hardware) {
            Category::HardwareIssue
        } else {
            Category::NetworkIssue
        }
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            hardware: owned(HARDWARE_KEYWORDS),
            network: owned(NETWORK_KEYWORDS),
            access: owned(ACCESS_KEYWORDS),
            safety_net_hardware: owned(SAFETY_NET_HARDWARE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignmentTable {
    assignees: HashMap<Category, String>,
    fallback: String,
}

impl AssignmentTable {
    pub fn new(assignees: HashMap<Category, String>, fallback: impl Into<String>) -> Self {
        Self {
            assignees,
            fallback: fallback.into(),
        }
    }

    pub fn resolve(&self, category: Category) -> &str {
        self.assignees
            .get(&category)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

impl Default for AssignmentTable {
    fn default() -> Self {
        let assignees = HashMap::from([
            (Category::NetworkIssue, "Arindam Sen(Network Engineer)".to_string()),
            (Category::SecurityIssue, "Sayan Roy(Security Analyst)".to_string()),
            (Category::HardwareIssue, "Soham Das(Hardware Engineer)".to_string()),
            (Category::AccessIssue, "Subhajit Paul(IT Administrator)".to_string()),
        ]);
        Self::new(assignees, DEFAULT_ASSIGNEE)
    }
}

/// Immutable lookup data the triage engine is built with.
#[derive(Debug, Clone, Default)]
pub struct TriageRules {
    pub stop_words: StopWords,
    pub keywords: KeywordRules,
    pub assignments: AssignmentTable,
}
