//! Article domain model.
//!
//! # Responsibility
//! - Define the canonical article record and the pre-insert shape.
//! - Provide pure validation and status normalization shared by the
//!   create and update paths.
//!
//! # Invariants
//! - `title`, `content` and `category` meet their minimum lengths after
//!   trimming; the stored string is the raw caller input.
//! - `status` is always one of the three canonical variants.
//! - `created_at <= updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned identifier. Never reused after deletion.
pub type ArticleId = i64;

/// Minimum trimmed length of `title`, in characters.
pub const TITLE_MIN_CHARS: usize = 20;
/// Minimum trimmed length of `content`, in characters.
pub const CONTENT_MIN_CHARS: usize = 200;
/// Minimum trimmed length of `category`, in characters.
pub const CATEGORY_MIN_CHARS: usize = 3;

/// Publication state of an article.
///
/// Serialized with its canonical capitalized spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    Publish,
    Draft,
    Trash,
}

const STATUS_LOOKUP: [(&str, ArticleStatus); 3] = [
    ("publish", ArticleStatus::Publish),
    ("draft", ArticleStatus::Draft),
    ("trash", ArticleStatus::Trash),
];

impl ArticleStatus {
    /// Returns the canonical spelling used for storage and output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "Publish",
            Self::Draft => "Draft",
            Self::Trash => "Trash",
        }
    }
}

impl Display for ArticleStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = ArticleValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        normalize_status(value)
    }
}

/// Field-level rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    TitleTooShort { min: usize, actual: usize },
    ContentTooShort { min: usize, actual: usize },
    CategoryTooShort { min: usize, actual: usize },
    InvalidStatus(String),
    TimestampsOutOfOrder,
}

impl Display for ArticleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooShort { min, actual } => {
                write!(f, "title must be at least {min} characters (got {actual})")
            }
            Self::ContentTooShort { min, actual } => {
                write!(f, "content must be at least {min} characters (got {actual})")
            }
            Self::CategoryTooShort { min, actual } => {
                write!(f, "category must be at least {min} characters (got {actual})")
            }
            Self::InvalidStatus(raw) => write!(
                f,
                "invalid status `{raw}`, must be one of: Publish, Draft, Trash"
            ),
            Self::TimestampsOutOfOrder => write!(f, "updated_at must not precede created_at"),
        }
    }
}

impl Error for ArticleValidationError {}

/// Canonical persisted article record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
    /// Set once on insert.
    pub created_at: DateTime<Utc>,
    /// Bumped on every successful mutation.
    pub updated_at: DateTime<Utc>,
}

/// Article awaiting a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewArticle {
    /// Checks the same invariants as `Article::validate`.
    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        validate_fields(&self.title, &self.content, &self.category)?;
        validate_timestamps(self.created_at, self.updated_at)
    }

    /// Attaches the id assigned by the store.
    pub fn into_article(self, id: ArticleId) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Article {
    /// Re-checks every record invariant.
    ///
    /// `status` needs no check here: the type only admits canonical values.
    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        validate_fields(&self.title, &self.content, &self.category)?;
        validate_timestamps(self.created_at, self.updated_at)
    }
}

/// Validates the three text fields in order title, content, category.
///
/// Returns the first violated rule. Lengths are measured on trimmed input.
pub fn validate_fields(
    title: &str,
    content: &str,
    category: &str,
) -> Result<(), ArticleValidationError> {
    validate_title(title)?;
    validate_content(content)?;
    validate_category(category)
}

pub fn validate_title(title: &str) -> Result<(), ArticleValidationError> {
    let actual = trimmed_len(title);
    if actual < TITLE_MIN_CHARS {
        return Err(ArticleValidationError::TitleTooShort {
            min: TITLE_MIN_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), ArticleValidationError> {
    let actual = trimmed_len(content);
    if actual < CONTENT_MIN_CHARS {
        return Err(ArticleValidationError::ContentTooShort {
            min: CONTENT_MIN_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<(), ArticleValidationError> {
    let actual = trimmed_len(category);
    if actual < CATEGORY_MIN_CHARS {
        return Err(ArticleValidationError::CategoryTooShort {
            min: CATEGORY_MIN_CHARS,
            actual,
        });
    }
    Ok(())
}

/// Maps free-form status input onto a canonical variant.
///
/// Input is trimmed and compared case-insensitively against
/// `publish|draft|trash`. Anything else is rejected, never defaulted.
pub fn normalize_status(raw: &str) -> Result<ArticleStatus, ArticleValidationError> {
    let key = raw.trim().to_lowercase();
    STATUS_LOOKUP
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, status)| *status)
        .ok_or_else(|| ArticleValidationError::InvalidStatus(raw.to_string()))
}

fn validate_timestamps(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<(), ArticleValidationError> {
    if updated_at < created_at {
        return Err(ArticleValidationError::TimestampsOutOfOrder);
    }
    Ok(())
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}
