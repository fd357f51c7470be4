//! Article lifecycle engine.
//!
//! # Responsibility
//! - Validate and normalize caller input for create and update.
//! - Orchestrate store reads/writes into typed outcomes.
//!
//! # Invariants
//! - Nothing is written when validation fails.
//! - Update is fetch, validate, merge, replace: the merged candidate is
//!   fully checked before the single write.
//! - Missing ids surface as `NotFound` from get, update and delete alike.
//! - The engine holds no cached records; the store is authoritative.

use crate::clock::Clock;
use crate::model::article::{
    normalize_status, validate_category, validate_content, validate_fields, validate_title,
    Article, ArticleId, ArticleStatus, ArticleValidationError, NewArticle,
};
use crate::repo::article_repo::{ArticleStore, PageQuery, RepoError};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Typed failure of a lifecycle operation.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Caller input broke a field rule. No mutation happened.
    Validation(ArticleValidationError),
    /// Referenced article does not exist.
    NotFound(ArticleId),
    /// Underlying store failure. Not retried here.
    Storage(RepoError),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ArticleValidationError> for ArticleServiceError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ArticleServiceError>;

/// Input for `ArticleService::create`. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    /// Free-form; normalized to a canonical `ArticleStatus`.
    pub status: String,
}

/// Input for `ArticleService::update`.
///
/// `None` means "leave unchanged"; an empty string is a present value and
/// is validated like any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// Use-case service over one injected store handle and clock.
pub struct ArticleService<R: ArticleStore, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ArticleStore, C: Clock> ArticleService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Validates, normalizes and inserts a new article.
    ///
    /// # Contract
    /// - Checks title, content, category, then status; first failure wins.
    /// - `created_at == updated_at == now`.
    /// - Returns the stored record including its assigned id.
    pub fn create(&self, request: &CreateArticleRequest) -> ServiceResult<Article> {
        validate_fields(&request.title, &request.content, &request.category)?;
        let status = normalize_status(&request.status)?;

        let now = self.clock.now();
        let draft = NewArticle {
            title: request.title.clone(),
            content: request.content.clone(),
            category: request.category.clone(),
            status,
            created_at: now,
            updated_at: now,
        };

        let id = self.repo.insert(&draft).map_err(ArticleServiceError::Storage)?;
        Ok(draft.into_article(id))
    }

    /// Fetches one article.
    pub fn get_by_id(&self, id: ArticleId) -> ServiceResult<Article> {
        self.fetch_existing(id)
    }

    /// Lists articles newest first.
    ///
    /// An out-of-range page is an empty list, not an error. Page size is
    /// not capped here.
    pub fn list(&self, limit: u32, offset: u32) -> ServiceResult<Vec<Article>> {
        self.repo
            .fetch_page(PageQuery { limit, offset })
            .map_err(ArticleServiceError::Storage)
    }

    /// Applies the present fields of `request` to an existing article.
    ///
    /// # Contract
    /// - Fields are checked in order title, content, category, status.
    /// - Absent fields keep their stored value; `created_at` never changes.
    /// - `updated_at` is bumped even when the request carries no fields.
    pub fn update(
        &self,
        id: ArticleId,
        request: &UpdateArticleRequest,
    ) -> ServiceResult<Article> {
        let current = self.fetch_existing(id)?;
        let changes = ValidatedChanges::check(request)?;

        let mut merged = changes.apply(current);
        merged.updated_at = self.clock.now().max(merged.created_at);

        self.repo.replace(&merged)?;
        Ok(merged)
    }

    /// Removes an existing article. Missing ids are `NotFound`, not success.
    pub fn delete(&self, id: ArticleId) -> ServiceResult<()> {
        self.fetch_existing(id)?;
        self.repo.delete_by_id(id)?;
        Ok(())
    }

    fn fetch_existing(&self, id: ArticleId) -> ServiceResult<Article> {
        self.repo
            .fetch_by_id(id)
            .map_err(ArticleServiceError::Storage)?
            .ok_or(ArticleServiceError::NotFound(id))
    }
}

/// Update fields that already passed their individual rules.
struct ValidatedChanges<'a> {
    title: Option<&'a str>,
    content: Option<&'a str>,
    category: Option<&'a str>,
    status: Option<ArticleStatus>,
}

impl<'a> ValidatedChanges<'a> {
    fn check(request: &'a UpdateArticleRequest) -> Result<Self, ArticleValidationError> {
        let title = request.title.as_deref();
        let content = request.content.as_deref();
        let category = request.category.as_deref();

        if let Some(title) = title {
            validate_title(title)?;
        }
        if let Some(content) = content {
            validate_content(content)?;
        }
        if let Some(category) = category {
            validate_category(category)?;
        }
        let status = request.status.as_deref().map(normalize_status).transpose()?;

        Ok(Self {
            title,
            content,
            category,
            status,
        })
    }

    fn apply(self, mut article: Article) -> Article {
        if let Some(title) = self.title {
            article.title = title.to_string();
        }
        if let Some(content) = self.content {
            article.content = content.to_string();
        }
        if let Some(category) = self.category {
            article.category = category.to_string();
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        article
    }
}
