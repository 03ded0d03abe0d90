//! crates/devforum_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the engine's collaborators.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete document store behind it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Interaction, Question, QuestionSummary, TagSummary};
use crate::query::{PageWindow, QuestionCriteria, QuestionSort, TagCriteria};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Port (Trait)
//=========================================================================================

/// Read-only access to the question/tag/interaction collections.
///
/// Every method is a single, side-effect-free read. The store is responsible
/// for its own read consistency; the engine assumes each call observes a
/// snapshot sufficient to compute one page deterministically.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Counts the questions matching `criteria`.
    async fn count_questions(&self, criteria: &QuestionCriteria) -> PortResult<u64>;

    /// Fetches one window of matching questions in `sort` order, with
    /// author and tag references resolved.
    async fn find_questions(
        &self,
        criteria: &QuestionCriteria,
        sort: QuestionSort,
        window: PageWindow,
    ) -> PortResult<Vec<QuestionSummary>>;

    /// Fetches raw questions by id. Unknown ids are skipped, not errors.
    async fn questions_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Question>>;

    /// Fetches the full interaction log for one user.
    async fn interactions_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interaction>>;

    /// Counts the tags matching `criteria`.
    async fn count_tags(&self, criteria: &TagCriteria) -> PortResult<u64>;

    /// Fetches one window of matching tags, ordered by question count
    /// descending, ties broken by name.
    async fn find_tags(
        &self,
        criteria: &TagCriteria,
        window: PageWindow,
    ) -> PortResult<Vec<TagSummary>>;
}
