//! crates/devforum_core/src/listing.rs
//!
//! The listing engine: validates a query, compiles it to criteria, runs the
//! paginated read through the [`ContentStore`] port, and shapes the result
//! page. Stateless; every call is an independent read.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{QuestionSummary, TagSummary, TargetKind};
use crate::ports::{ContentStore, PortError};
use crate::query::{QuestionFilter, QuestionQuery, TagQuery, ValidationError};

/// One page of a paginated listing. `has_next` is true iff matches exist
/// beyond this window.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// The defined empty result: no items, no further pages. Used for the
    /// unauthenticated recommended filter and empty candidate pools.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_next: false,
        }
    }
}

/// Failure of a listing call. `Invalid` is the only kind the engine itself
/// produces; `Store` propagates collaborator failures untouched.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

/// The question/tag listing engine. Holds nothing but the store handle, so
/// concurrent calls need no coordination.
#[derive(Clone)]
pub struct ListingEngine {
    store: Arc<dyn ContentStore>,
}

impl ListingEngine {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Lists questions for `query`. `caller` is the authenticated user, if
    /// any; it is only consulted by the recommended filter.
    pub async fn list_questions(
        &self,
        query: QuestionQuery,
        caller: Option<Uuid>,
    ) -> Result<Page<QuestionSummary>, ListError> {
        let query = query.validate()?;
        let mut criteria = query.criteria();

        if query.filter == QuestionFilter::Recommended {
            // Unauthenticated callers get the defined empty page, not an error.
            let Some(user) = caller else {
                return Ok(Page::empty());
            };
            match self.recommendation_criteria(user, &mut criteria).await? {
                CandidatePool::Empty => return Ok(Page::empty()),
                CandidatePool::Restricted => {}
            }
        }

        let window = query.window();
        let total = self.store.count_questions(&criteria).await?;
        let items = self
            .store
            .find_questions(&criteria, query.sort(), window)
            .await?;
        Ok(Page {
            items,
            has_next: window.has_next(total),
        })
    }

    /// Lists tags for `query`, ordered by question count descending with
    /// name as the tie-break.
    pub async fn list_tags(&self, query: TagQuery) -> Result<Page<TagSummary>, ListError> {
        let query = query.validate()?;
        let criteria = query.criteria();
        let window = query.window();
        let total = self.store.count_tags(&criteria).await?;
        let items = self.store.find_tags(&criteria, window).await?;
        Ok(Page {
            items,
            has_next: window.has_next(total),
        })
    }

    /// Narrows `criteria` to the caller's recommended pool: questions
    /// sharing a tag with questions the caller interacted with, minus the
    /// caller's own questions and the already-interacted ones.
    async fn recommendation_criteria(
        &self,
        user: Uuid,
        criteria: &mut crate::query::QuestionCriteria,
    ) -> Result<CandidatePool, PortError> {
        let interactions = self.store.interactions_for_user(user).await?;
        let interacted: HashSet<Uuid> = interactions
            .iter()
            .filter(|i| i.action_type == TargetKind::Question)
            .map(|i| i.action_id)
            .collect();
        if interacted.is_empty() {
            return Ok(CandidatePool::Empty);
        }

        let interacted_ids: Vec<Uuid> = interacted.iter().copied().collect();
        let seen = self.store.questions_by_ids(&interacted_ids).await?;
        let tag_ids: HashSet<Uuid> = seen
            .iter()
            .flat_map(|q| q.tag_ids.iter().copied())
            .collect();
        if tag_ids.is_empty() {
            return Ok(CandidatePool::Empty);
        }

        criteria.with_any_tag = Some(tag_ids);
        criteria.exclude_questions = interacted;
        criteria.exclude_author = Some(user);
        Ok(CandidatePool::Restricted)
    }
}

enum CandidatePool {
    /// No interactions or no tags to pivot on; the listing is empty by
    /// definition and the store need not be queried further.
    Empty,
    Restricted,
}
