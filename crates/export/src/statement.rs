//! Prepared-statement rendering for the target `statuses` table.
//!
//! The artifact is one `PREPARE` followed by one `EXECUTE` per post. Column
//! order and count are fixed; downstream tooling relies on both. The conflict
//! clause names no target, so a row clashing on `id` or on `uri` is skipped.

use fedi_backfill_core::Post;

use crate::error::ExportError;

/// Name of the prepared statement.
pub const STATEMENT_NAME: &str = "backfill_statuses";

/// Target table.
pub const TABLE_NAME: &str = "statuses";

/// Target columns, in parameter order.
pub const COLUMNS: [&str; 23] = [
    "id",
    "uri",
    "text",
    "created_at",
    "updated_at",
    "in_reply_to_id",
    "reblog_of_id",
    "url",
    "sensitive",
    "visibility",
    "spoiler_text",
    "reply",
    "language",
    "conversation_id",
    "local",
    "account_id",
    "application_id",
    "in_reply_to_account_id",
    "poll_id",
    "deleted_at",
    "edited_at",
    "trendable",
    "ordered_media_attachment_ids",
];

pub const PARAMETER_COUNT: usize = COLUMNS.len();

/// Literal emitted for absent values.
pub const NULL: &str = "null";

/// The `PREPARE` line that every artifact starts with.
#[must_use]
pub fn template_declaration() -> String {
    let placeholders: Vec<String> = (1..=PARAMETER_COUNT).map(|i| format!("${i}")).collect();
    format!(
        "PREPARE {STATEMENT_NAME} AS INSERT INTO {TABLE_NAME} ({}) VALUES ({}) ON CONFLICT DO NOTHING;",
        COLUMNS.join(","),
        placeholders.join(", ")
    )
}

/// Renders the `EXECUTE` statement for `post` with its own attachment ids.
///
/// # Errors
/// See [`encode_post_with_attachments`].
pub fn encode_post(post: &Post) -> Result<String, ExportError> {
    encode_post_with_attachments(post, &post.attachment_ids)
}

/// Renders the `EXECUTE` statement for `post`.
///
/// # Errors
/// [`ExportError::Visibility`] for a visibility outside the closed table,
/// [`ExportError::MalformedId`] when an id-valued field is not numeric.
pub fn encode_post_with_attachments(
    post: &Post,
    attachment_ids: &[String],
) -> Result<String, ExportError> {
    let params = post_parameters(post, attachment_ids)?;
    let statement = format!("EXECUTE {STATEMENT_NAME} ({});", params.join(", "));

    let count = count_parameters(&statement).unwrap_or(0);
    if count != PARAMETER_COUNT {
        return Err(ExportError::ParameterCount { post_id: post.id.clone(), count });
    }
    Ok(statement)
}

fn post_parameters(post: &Post, attachment_ids: &[String]) -> Result<Vec<String>, ExportError> {
    let visibility = post
        .parsed_visibility()
        .map_err(|source| ExportError::Visibility { post_id: post.id.clone(), source })?;
    let optional_id = |field: &'static str, value: Option<&str>| {
        value.map_or_else(|| Ok(NULL.to_owned()), |v| numeric_id(&post.id, field, v))
    };

    Ok(vec![
        numeric_id(&post.id, "id", &post.id)?,
        quote(&post.uri),
        quote(&post.text),
        post.created_at.timestamp().to_string(),
        post.updated_at().timestamp().to_string(),
        optional_id("in_reply_to_id", post.parent_id.as_deref())?,
        optional_id("reblog_of_id", post.reblog_of_id.as_deref())?,
        quote_optional(post.url.as_deref()),
        post.sensitive.to_string(),
        visibility.code().to_string(),
        quote(&post.spoiler_text),
        post.is_reply().to_string(),
        quote_optional(post.language.as_deref()),
        NULL.to_owned(),
        "true".to_owned(),
        numeric_id(&post.id, "account_id", &post.author_account_id)?,
        NULL.to_owned(),
        optional_id("in_reply_to_account_id", post.parent_account_id.as_deref())?,
        NULL.to_owned(),
        NULL.to_owned(),
        post.edited_at.map_or_else(|| NULL.to_owned(), |t| t.timestamp().to_string()),
        "false".to_owned(),
        attachment_array(&post.id, attachment_ids)?,
    ])
}

/// Single-quoted SQL literal with embedded quotes doubled.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn quote_optional(text: Option<&str>) -> String {
    text.map_or_else(|| NULL.to_owned(), quote)
}

fn numeric_id(post_id: &str, field: &'static str, value: &str) -> Result<String, ExportError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_owned())
    } else {
        Err(ExportError::MalformedId {
            post_id: post_id.to_owned(),
            field,
            value: value.to_owned(),
        })
    }
}

/// `'{1,2,3}'`, or `null` for no attachments.
fn attachment_array(post_id: &str, ids: &[String]) -> Result<String, ExportError> {
    if ids.is_empty() {
        return Ok(NULL.to_owned());
    }
    let ids = ids
        .iter()
        .map(|id| numeric_id(post_id, "ordered_media_attachment_ids", id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("'{{{}}}'", ids.join(",")))
}

/// Number of top-level parameters in an `EXECUTE name (...);` statement,
/// ignoring commas inside quoted literals. `None` if the statement is not of
/// that shape or has an unterminated literal.
#[must_use]
pub fn count_parameters(statement: &str) -> Option<usize> {
    let args = statement
        .strip_prefix("EXECUTE ")?
        .split_once(" (")?
        .1
        .strip_suffix(");")?;

    let mut in_literal = false;
    let mut count = 1;
    for c in args.chars() {
        match c {
            '\'' => in_literal = !in_literal,
            ',' if !in_literal => count += 1,
            _ => {},
        }
    }
    (!in_literal).then_some(count)
}
