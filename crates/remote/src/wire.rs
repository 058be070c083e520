use chrono::{DateTime, Utc};
use fedi_backfill_core::Post;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteAccount {
    pub id: String,
    pub username: String,
    pub acct: String,
}

#[derive(Deserialize)]
pub(crate) struct StatusJson {
    pub id: String,
    pub uri: String,
    pub url: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub spoiler_text: String,
    pub language: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub in_reply_to_id: Option<String>,
    pub in_reply_to_account_id: Option<String>,
    pub reblog: Option<ReblogJson>,
    pub account: AccountRefJson,
    #[serde(default)]
    pub media_attachments: Vec<AttachmentJson>,
}

#[derive(Deserialize)]
pub(crate) struct ReblogJson {
    pub id: String,
}

#[derive(Deserialize)]
pub(crate) struct AccountRefJson {
    pub id: String,
}

#[derive(Deserialize)]
pub(crate) struct AttachmentJson {
    pub id: String,
}

/// Collapses absent and blank values into `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<StatusJson> for Post {
    fn from(status: StatusJson) -> Self {
        Self {
            id: status.id,
            uri: status.uri,
            url: non_empty(status.url),
            text: status.content,
            spoiler_text: status.spoiler_text,
            language: non_empty(status.language),
            sensitive: status.sensitive,
            visibility: status.visibility,
            created_at: status.created_at,
            edited_at: status.edited_at,
            parent_id: non_empty(status.in_reply_to_id),
            parent_account_id: non_empty(status.in_reply_to_account_id),
            reblog_of_id: status.reblog.map(|r| r.id),
            author_account_id: status.account.id,
            attachment_ids: status.media_attachments.into_iter().map(|a| a.id).collect(),
        }
    }
}
