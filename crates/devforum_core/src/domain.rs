//! crates/devforum_core/src/domain.rs
//!
//! Defines the pure, core data structures for the forum.
//! These structs are independent of any database or web framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question as stored, with unresolved author/tag references.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub tag_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub answers: i64,
    pub views: i64,
}

/// A tag with its usage count. Names are unique and matched
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub questions: i64,
}

// Represents a registered user - used throughout the app.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
}

/// The kind of action recorded in an [`Interaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionAction {
    View,
    Upvote,
    Downvote,
    Post,
    Answer,
}

/// The kind of entity an [`Interaction`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Question,
    Answer,
}

/// One entry of the append-only interaction log. Read-only input to the
/// recommendation path; this crate never writes it.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: InteractionAction,
    pub action_id: Uuid,
    pub action_type: TargetKind,
}

//=========================================================================================
// Read-model summaries (what listings return)
//=========================================================================================

/// A question's author, resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

/// A resolved tag reference on a question summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
}

/// One item of a question listing, with author and tags resolved.
/// A question with no tags carries an empty `tags` vec, never a null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorSummary,
    pub tags: Vec<TagRef>,
    pub created_at: DateTime<Utc>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub answers: i64,
    pub views: i64,
}

/// One item of a tag listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: Uuid,
    pub name: String,
    pub questions: i64,
}
