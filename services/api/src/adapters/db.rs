//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ContentStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Criteria arrive as plain values, so the WHERE clause is composed at runtime
//! with `QueryBuilder` rather than compile-time checked macros.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devforum_core::domain::{
    AuthorSummary, Interaction, InteractionAction, Question, QuestionSummary, TagRef, TagSummary,
    TargetKind,
};
use devforum_core::ports::{ContentStore, PortError, PortResult};
use devforum_core::query::{PageWindow, QuestionCriteria, QuestionSort, TagCriteria};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A PostgreSQL adapter that implements the `ContentStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Fetches the resolved tag refs for a set of questions, grouped by
    /// question id.
    async fn tags_for_questions(
        &self,
        question_ids: &[Uuid],
    ) -> PortResult<HashMap<Uuid, Vec<TagRef>>> {
        if question_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<QuestionTagRow> = sqlx::query_as(
            "SELECT qt.question_id, t.id AS tag_id, t.name AS tag_name \
             FROM question_tags qt \
             JOIN tags t ON t.id = qt.tag_id \
             WHERE qt.question_id = ANY($1)",
        )
        .bind(question_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_question: HashMap<Uuid, Vec<TagRef>> = HashMap::new();
        for row in rows {
            by_question.entry(row.question_id).or_default().push(TagRef {
                id: row.tag_id,
                name: row.tag_name,
            });
        }
        Ok(by_question)
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Escapes LIKE wildcards so the free-text query matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

//=========================================================================================
// Criteria -> SQL composition
//=========================================================================================

/// Appends the WHERE clause for `criteria` to a query over `questions q`.
fn push_question_criteria(qb: &mut QueryBuilder<'_, Postgres>, criteria: &QuestionCriteria) {
    qb.push(" WHERE TRUE");
    if let Some(text) = &criteria.text {
        let pattern = like_pattern(text);
        qb.push(" AND (q.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR q.content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if criteria.unanswered_only {
        qb.push(" AND q.answers = 0");
    }
    if let Some(tags) = &criteria.with_any_tag {
        let tag_ids: Vec<Uuid> = tags.iter().copied().collect();
        qb.push(
            " AND EXISTS (SELECT 1 FROM question_tags qt \
             WHERE qt.question_id = q.id AND qt.tag_id = ANY(",
        )
        .push_bind(tag_ids)
        .push("))");
    }
    if !criteria.exclude_questions.is_empty() {
        let excluded: Vec<Uuid> = criteria.exclude_questions.iter().copied().collect();
        qb.push(" AND q.id <> ALL(").push_bind(excluded).push(")");
    }
    if let Some(author) = criteria.exclude_author {
        qb.push(" AND q.author_id <> ").push_bind(author);
    }
}

fn push_tag_criteria(qb: &mut QueryBuilder<'_, Postgres>, criteria: &TagCriteria) {
    qb.push(" WHERE TRUE");
    if let Some(text) = &criteria.text {
        qb.push(" AND t.name ILIKE ").push_bind(like_pattern(text));
    }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: PageWindow) {
    qb.push(" OFFSET ")
        .push_bind(window.offset as i64)
        .push(" LIMIT ")
        .push_bind(window.limit as i64);
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct QuestionSummaryRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    author_name: String,
    author_image: Option<String>,
    created_at: DateTime<Utc>,
    upvotes: i64,
    downvotes: i64,
    answers: i64,
    views: i64,
}

impl QuestionSummaryRow {
    fn to_domain(self, tags: Vec<TagRef>) -> QuestionSummary {
        QuestionSummary {
            id: self.id,
            title: self.title,
            content: self.content,
            author: AuthorSummary {
                id: self.author_id,
                name: self.author_name,
                image: self.author_image,
            },
            tags,
            created_at: self.created_at,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            answers: self.answers,
            views: self.views,
        }
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    upvotes: i64,
    downvotes: i64,
    answers: i64,
    views: i64,
}

impl QuestionRow {
    fn to_domain(self, tag_ids: Vec<Uuid>) -> Question {
        Question {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            tag_ids,
            created_at: self.created_at,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            answers: self.answers,
            views: self.views,
        }
    }
}

#[derive(FromRow)]
struct QuestionTagRow {
    question_id: Uuid,
    tag_id: Uuid,
    tag_name: String,
}

#[derive(FromRow)]
struct TagSummaryRow {
    id: Uuid,
    name: String,
    questions: i64,
}

#[derive(FromRow)]
struct InteractionRow {
    id: Uuid,
    user_id: Uuid,
    action: String,
    action_id: Uuid,
    action_type: String,
}

impl InteractionRow {
    fn to_domain(self) -> PortResult<Interaction> {
        let action = match self.action.as_str() {
            "view" => InteractionAction::View,
            "upvote" => InteractionAction::Upvote,
            "downvote" => InteractionAction::Downvote,
            "post" => InteractionAction::Post,
            "answer" => InteractionAction::Answer,
            other => {
                return Err(PortError::Unexpected(format!(
                    "Unknown interaction action '{}'",
                    other
                )))
            }
        };
        let action_type = match self.action_type.as_str() {
            "question" => TargetKind::Question,
            "answer" => TargetKind::Answer,
            other => {
                return Err(PortError::Unexpected(format!(
                    "Unknown interaction target kind '{}'",
                    other
                )))
            }
        };
        Ok(Interaction {
            id: self.id,
            user_id: self.user_id,
            action,
            action_id: self.action_id,
            action_type,
        })
    }
}

//=========================================================================================
// `ContentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentStore for PgStore {
    async fn count_questions(&self, criteria: &QuestionCriteria) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM questions q");
        push_question_criteria(&mut qb, criteria);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count as u64)
    }

    async fn find_questions(
        &self,
        criteria: &QuestionCriteria,
        sort: QuestionSort,
        window: PageWindow,
    ) -> PortResult<Vec<QuestionSummary>> {
        let mut qb = QueryBuilder::new(
            "SELECT q.id, q.title, q.content, q.author_id, q.created_at, \
             q.upvotes, q.downvotes, q.answers, q.views, \
             u.name AS author_name, u.image AS author_image \
             FROM questions q \
             JOIN users u ON u.id = q.author_id",
        );
        push_question_criteria(&mut qb, criteria);
        match sort {
            QuestionSort::CreatedDesc => qb.push(" ORDER BY q.created_at DESC"),
            QuestionSort::UpvotesDesc => qb.push(" ORDER BY q.upvotes DESC, q.created_at DESC"),
        };
        push_window(&mut qb, window);

        let rows: Vec<QuestionSummaryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags = self.tags_for_questions(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let row_tags = tags.remove(&row.id).unwrap_or_default();
                row.to_domain(row_tags)
            })
            .collect())
    }

    async fn questions_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT id, title, content, author_id, created_at, upvotes, downvotes, answers, views \
             FROM questions WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let tag_rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT question_id, tag_id FROM question_tags WHERE question_id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut tag_ids: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (question_id, tag_id) in tag_rows {
            tag_ids.entry(question_id).or_default().push(tag_id);
        }
        Ok(rows
            .into_iter()
            .map(|row| {
                let row_tags = tag_ids.remove(&row.id).unwrap_or_default();
                row.to_domain(row_tags)
            })
            .collect())
    }

    async fn interactions_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(
            "SELECT id, user_id, action, action_id, action_type \
             FROM interactions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn count_tags(&self, criteria: &TagCriteria) -> PortResult<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM tags t");
        push_tag_criteria(&mut qb, criteria);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count as u64)
    }

    async fn find_tags(
        &self,
        criteria: &TagCriteria,
        window: PageWindow,
    ) -> PortResult<Vec<TagSummary>> {
        let mut qb = QueryBuilder::new("SELECT t.id, t.name, t.questions FROM tags t");
        push_tag_criteria(&mut qb, criteria);
        qb.push(" ORDER BY t.questions DESC, t.name ASC");
        push_window(&mut qb, window);

        let rows: Vec<TagSummaryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(rows
            .into_iter()
            .map(|r| TagSummary {
                id: r.id,
                name: r.name,
                questions: r.questions,
            })
            .collect())
    }
}

//=========================================================================================
// Tests
//=========================================================================================
