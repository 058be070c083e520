//! The migrated status and its visibility classification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Audience of a post, as understood by the target `statuses.visibility` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone, shown in public timelines
    Public,
    /// Visible to everyone, hidden from public timelines
    Unlisted,
    /// Followers only
    Private,
    /// Mentioned accounts only
    Direct,
    /// Circle-restricted audience
    Limited,
}

impl Visibility {
    pub const ALL_VARIANTS: &'static [Visibility] = &[
        Visibility::Public,
        Visibility::Unlisted,
        Visibility::Private,
        Visibility::Direct,
        Visibility::Limited,
    ];

    /// Integer stored in the target schema. The table is closed and must
    /// match the target exactly.
    #[must_use]
    pub const fn code(&self) -> i16 {
        match *self {
            Self::Public => 0,
            Self::Unlisted => 1,
            Self::Private => 2,
            Self::Direct => 3,
            Self::Limited => 4,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Direct => "direct",
            Self::Limited => "limited",
        }
    }
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            "direct" => Ok(Self::Direct),
            "limited" => Ok(Self::Limited),
            other => Err(CoreError::UnknownVisibility(other.to_owned())),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status fetched from a source instance.
///
/// Optional fields are resolved once when the remote payload is ingested;
/// nothing downstream distinguishes "absent" from "empty".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Instance-local identifier
    pub id: String,
    /// Canonical ActivityPub locator
    pub uri: String,
    /// Human-facing permalink
    pub url: Option<String>,
    /// Rendered HTML content
    pub text: String,
    /// Content warning, empty when none
    pub spoiler_text: String,
    pub language: Option<String>,
    pub sensitive: bool,
    /// Visibility exactly as reported by the remote; see [`Post::parsed_visibility`]
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    /// Post this one replies to
    pub parent_id: Option<String>,
    /// Account this one replies to
    pub parent_account_id: Option<String>,
    /// Boosted post; never traversed
    pub reblog_of_id: Option<String>,
    pub author_account_id: String,
    /// Ordered media attachment identifiers
    pub attachment_ids: Vec<String>,
}

impl Post {
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Last-modified time: the edit time, or creation time for unedited posts.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.edited_at.unwrap_or(self.created_at)
    }

    /// Map the raw visibility string through the closed enumeration.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownVisibility`] for any value outside the table.
    pub fn parsed_visibility(&self) -> Result<Visibility, CoreError> {
        self.visibility.parse()
    }
}
