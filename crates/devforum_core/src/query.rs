//! crates/devforum_core/src/query.rs
//!
//! Input types for the listing operations: the raw query parameters as they
//! arrive from a caller, their validated forms, and the criteria values the
//! validated forms compile down to.
//!
//! Raw queries are loosely-typed on purpose (every field optional, exactly
//! what a query string deserializes into); validation happens in one explicit
//! step before any store access, and everything downstream works with the
//! validated types only.

use std::collections::HashSet;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Question, Tag};

/// Page size applied when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

//=========================================================================================
// Raw query inputs
//=========================================================================================

/// The named filter policies for question listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionFilter {
    Newest,
    Unanswered,
    Popular,
    Recommended,
}

/// Raw parameters of a question listing request, prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub query: Option<String>,
    pub filter: Option<QuestionFilter>,
}

/// Raw parameters of a tag listing request, prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub query: Option<String>,
}

//=========================================================================================
// Validation
//=========================================================================================

/// Rejection of a malformed query. The only error kind the engine itself
/// produces; empty results are never modeled as errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Page must be at least 1")]
    PageTooSmall,
    #[error("Page size must be at least 1")]
    PageSizeTooSmall,
}

fn validate_paging(page: Option<i64>, page_size: Option<i64>) -> Result<(u64, u64), ValidationError> {
    let page = match page {
        Some(p) if p < 1 => return Err(ValidationError::PageTooSmall),
        Some(p) => p as u64,
        None => 1,
    };
    let page_size = match page_size {
        Some(s) if s < 1 => return Err(ValidationError::PageSizeTooSmall),
        Some(s) => s as u64,
        None => DEFAULT_PAGE_SIZE,
    };
    Ok((page, page_size))
}

/// A question query that passed validation. `filter` is collapsed: an absent
/// filter behaves exactly like `newest`.
#[derive(Debug, Clone)]
pub struct ValidQuestionQuery {
    pub page: u64,
    pub page_size: u64,
    pub text: Option<String>,
    pub filter: QuestionFilter,
}

impl QuestionQuery {
    /// Validates the raw parameters, applying the documented defaults.
    /// Fails fast; nothing is queried when the parameters are invalid.
    pub fn validate(self) -> Result<ValidQuestionQuery, ValidationError> {
        let (page, page_size) = validate_paging(self.page, self.page_size)?;
        Ok(ValidQuestionQuery {
            page,
            page_size,
            text: self.query,
            filter: self.filter.unwrap_or(QuestionFilter::Newest),
        })
    }
}

impl ValidQuestionQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::for_page(self.page, self.page_size)
    }

    /// The criteria implied by the filter and free-text query alone.
    /// The recommended filter layers its exclusions on top of this.
    pub fn criteria(&self) -> QuestionCriteria {
        QuestionCriteria {
            text: self.text.clone(),
            unanswered_only: self.filter == QuestionFilter::Unanswered,
            ..QuestionCriteria::default()
        }
    }

    pub fn sort(&self) -> QuestionSort {
        match self.filter {
            QuestionFilter::Popular => QuestionSort::UpvotesDesc,
            _ => QuestionSort::CreatedDesc,
        }
    }
}

/// A tag query that passed validation.
#[derive(Debug, Clone)]
pub struct ValidTagQuery {
    pub page: u64,
    pub page_size: u64,
    pub text: Option<String>,
}

impl TagQuery {
    pub fn validate(self) -> Result<ValidTagQuery, ValidationError> {
        let (page, page_size) = validate_paging(self.page, self.page_size)?;
        Ok(ValidTagQuery {
            page,
            page_size,
            text: self.query,
        })
    }
}

impl ValidTagQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::for_page(self.page, self.page_size)
    }

    pub fn criteria(&self) -> TagCriteria {
        TagCriteria {
            text: self.text.clone(),
        }
    }
}

//=========================================================================================
// Pagination window
//=========================================================================================

/// One page worth of a sorted result set: skip `offset`, take `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn for_page(page: u64, page_size: u64) -> Self {
        Self {
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// Whether a further page exists given the total match count.
    pub fn has_next(&self, total: u64) -> bool {
        total > self.offset.saturating_add(self.limit)
    }
}

//=========================================================================================
// Criteria values
//=========================================================================================

/// The sort order of a question listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSort {
    CreatedDesc,
    UpvotesDesc,
}

/// The predicate of a question listing, as a plain value. Assembled by pure
/// functions from a validated query and handed to the store; `matches` is the
/// reference semantics any store implementation must agree with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionCriteria {
    /// Case-insensitive substring match against title OR content.
    pub text: Option<String>,
    /// Restrict to questions with zero answers.
    pub unanswered_only: bool,
    /// Restrict to questions whose tag set intersects this set.
    pub with_any_tag: Option<HashSet<Uuid>>,
    /// Questions to drop regardless of the other conditions.
    pub exclude_questions: HashSet<Uuid>,
    /// Drop questions written by this author.
    pub exclude_author: Option<Uuid>,
}

impl QuestionCriteria {
    pub fn matches(&self, question: &Question) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_title = question.title.to_lowercase().contains(&needle);
            let in_content = question.content.to_lowercase().contains(&needle);
            if !in_title && !in_content {
                return false;
            }
        }
        if self.unanswered_only && question.answers != 0 {
            return false;
        }
        if let Some(tags) = &self.with_any_tag {
            if !question.tag_ids.iter().any(|t| tags.contains(t)) {
                return false;
            }
        }
        if self.exclude_questions.contains(&question.id) {
            return false;
        }
        if self.exclude_author == Some(question.author_id) {
            return false;
        }
        true
    }
}

/// The predicate of a tag listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCriteria {
    /// Case-insensitive substring match against the tag name.
    pub text: Option<String>,
}

impl TagCriteria {
    pub fn matches(&self, tag: &Tag) -> bool {
        match &self.text {
            Some(text) => tag.name.to_lowercase().contains(&text.to_lowercase()),
            None => true,
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
