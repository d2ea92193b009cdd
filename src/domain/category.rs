use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    NetworkIssue,
    SecurityIssue,
    HardwareIssue,
    AccessIssue,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NetworkIssue => "Network Issue",
            Category::SecurityIssue => "Security Issue",
            Category::HardwareIssue => "Hardware Issue",
            Category::AccessIssue => "Access Issue",
        }
    }

    /// Maps a free-form model reply onto a category by substring, checking
    /// network, hardware, access, then security.
    pub fn from_inference(reply: &str) -> Option<Self> {
        let lowered = reply.trim().to_lowercase();
        [
            ("network", Category::NetworkIssue),
            ("hardware", Category::HardwareIssue),
            ("access", Category::AccessIssue),
            ("security", Category::SecurityIssue),
        ]
        .into_iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, category)| category)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_model_reply() {
        assert_eq!(
            Category::from_inference("  Hardware Issue\n"),
            Some(Category::HardwareIssue)
        );
        assert_eq!(
            Category::from_inference("ACCESS ISSUE"),
            Some(Category::AccessIssue)
        );
        assert_eq!(Category::from_inference("no idea"), None);
    }

    #[test]
    fn network_wins_over_later_matches() {
        assert_eq!(
            Category::from_inference("network security"),
            Some(Category::NetworkIssue)
        );
        assert_eq!(
            Category::from_inference("security access"),
            Some(Category::AccessIssue)
        );
    }
}
