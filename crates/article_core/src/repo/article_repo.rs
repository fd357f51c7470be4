//! Article store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five store primitives used by the lifecycle engine.
//! - Translate between `Article` and the `articles` table.
//!
//! # Invariants
//! - `insert` and `replace` validate before writing.
//! - Read paths reject malformed rows instead of masking them.
//! - Pages are ordered by `created_at DESC, id DESC`.

use crate::db::DbError;
use crate::model::article::{
    Article, ArticleId, ArticleStatus, ArticleValidationError, NewArticle,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    status,
    created_at,
    updated_at
FROM articles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure.
#[derive(Debug)]
pub enum RepoError {
    Validation(ArticleValidationError),
    Db(DbError),
    NotFound(ArticleId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted article data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ArticleValidationError> for RepoError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination window for `fetch_page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
}

/// Durable storage for article records. Owns no business rules.
pub trait ArticleStore {
    /// Inserts a new record and returns the assigned id.
    fn insert(&self, article: &NewArticle) -> RepoResult<ArticleId>;
    /// Looks up one record; `Ok(None)` when absent.
    fn fetch_by_id(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    /// Returns at most `limit` records after skipping `offset`, newest first.
    fn fetch_page(&self, query: PageQuery) -> RepoResult<Vec<Article>>;
    /// Overwrites every mutable column of an existing record.
    fn replace(&self, article: &Article) -> RepoResult<()>;
    /// Removes one record.
    fn delete_by_id(&self, id: ArticleId) -> RepoResult<()>;
}

impl<S: ArticleStore + ?Sized> ArticleStore for &S {
    fn insert(&self, article: &NewArticle) -> RepoResult<ArticleId> {
        (**self).insert(article)
    }

    fn fetch_by_id(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        (**self).fetch_by_id(id)
    }

    fn fetch_page(&self, query: PageQuery) -> RepoResult<Vec<Article>> {
        (**self).fetch_page(query)
    }

    fn replace(&self, article: &Article) -> RepoResult<()> {
        (**self).replace(article)
    }

    fn delete_by_id(&self, id: ArticleId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed article store.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArticleStore for SqliteArticleRepository<'_> {
    fn insert(&self, article: &NewArticle) -> RepoResult<ArticleId> {
        article.validate()?;

        self.conn.execute(
            "INSERT INTO articles (
                title,
                content,
                category,
                status,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                article.title.as_str(),
                article.content.as_str(),
                article.category.as_str(),
                article.status.as_str(),
                article.created_at.timestamp_micros(),
                article.updated_at.timestamp_micros(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn fetch_by_id(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_article_row(row)))
            .optional()?;
        row.transpose()
    }

    fn fetch_page(&self, query: PageQuery) -> RepoResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let mut rows = stmt.query(params![i64::from(query.limit), i64::from(query.offset)])?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(articles)
    }

    fn replace(&self, article: &Article) -> RepoResult<()> {
        article.validate()?;

        let changed = self.conn.execute(
            "UPDATE articles
             SET
                title = ?1,
                content = ?2,
                category = ?3,
                status = ?4,
                updated_at = ?5
             WHERE id = ?6;",
            params![
                article.title.as_str(),
                article.content.as_str(),
                article.category.as_str(),
                article.status.as_str(),
                article.updated_at.timestamp_micros(),
                article.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(article.id));
        }

        Ok(())
    }

    fn delete_by_id(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id: ArticleId = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in articles.status (id={id})"
        ))
    })?;

    let article = Article {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        status,
        created_at: parse_micros(row.get("created_at")?, "created_at", id)?,
        updated_at: parse_micros(row.get("updated_at")?, "updated_at", id)?,
    };
    article
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("article {id}: {err}")))?;
    Ok(article)
}

// Stored values are always canonical, so the lookup is exact-match.
fn parse_status(value: &str) -> Option<ArticleStatus> {
    match value {
        "Publish" => Some(ArticleStatus::Publish),
        "Draft" => Some(ArticleStatus::Draft),
        "Trash" => Some(ArticleStatus::Trash),
        _ => None,
    }
}

fn parse_micros(value: i64, column: &str, id: ArticleId) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{value}` out of range in articles.{column} (id={id})"
        ))
    })
}
