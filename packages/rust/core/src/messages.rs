//! Leadership message cards for the About page.

use serde::Serialize;
use sitepages_shared::{AboutPage, CANONICAL_ROLES, Leader};

use crate::classify::find_by_role;

/// Shown when a role has no leader or the leader has no message yet.
pub const MESSAGE_PLACEHOLDER: &str = "Message coming soon...";

/// Portrait used when a leader has no uploaded image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-user.jpg";

/// One message card, fully resolved for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipMessage {
    /// Canonical role title, e.g. "Chairman".
    pub title: String,
    pub name: String,
    pub image_url: String,
    /// HTML body.
    pub message: String,
}

impl LeadershipMessage {
    fn resolve(title: &str, leader: Option<&Leader>) -> Self {
        let name = leader
            .map(|l| l.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(title);
        let image_url = leader
            .and_then(|l| l.image_id.as_deref())
            .filter(|id| !id.is_empty())
            .map(|id| format!("/api/files/{id}"))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let message = leader
            .and_then(|l| l.message.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(MESSAGE_PLACEHOLDER);

        Self {
            title: title.to_string(),
            name: name.to_string(),
            image_url,
            message: message.to_string(),
        }
    }
}

/// One card per canonical role, in display order.
pub fn leadership_messages(leaders: &[Leader]) -> [LeadershipMessage; 3] {
    CANONICAL_ROLES.map(|title| LeadershipMessage::resolve(title, find_by_role(leaders, title)))
}

/// Everything the About page renders.
#[derive(Debug, Clone, Serialize)]
pub struct AboutView {
    #[serde(flatten)]
    pub page: AboutPage,
    pub messages: [LeadershipMessage; 3],
}

impl From<AboutPage> for AboutView {
    fn from(page: AboutPage) -> Self {
        let messages = leadership_messages(&page.leadership);
        Self { page, messages }
    }
}
