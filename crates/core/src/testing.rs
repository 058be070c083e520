//! Fixtures shared by the workspace's test suites.

use chrono::{TimeZone, Utc};

use crate::Post;

/// A public post from account `1`, created at a fixed instant; `id` must be numeric
/// if the post is going to be serialized.
#[must_use]
pub fn post(id: &str, parent_id: Option<&str>) -> Post {
    Post {
        id: id.to_owned(),
        uri: format!("https://source.example/users/alice/statuses/{id}"),
        url: Some(format!("https://source.example/@alice/{id}")),
        text: format!("<p>post {id}</p>"),
        spoiler_text: String::new(),
        language: Some("en".to_owned()),
        sensitive: false,
        visibility: "public".to_owned(),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
        edited_at: None,
        parent_id: parent_id.map(str::to_owned),
        parent_account_id: parent_id.map(|_| "1".to_owned()),
        reblog_of_id: None,
        author_account_id: "1".to_owned(),
        attachment_ids: Vec::new(),
    }
}
