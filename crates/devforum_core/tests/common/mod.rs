//! Shared test fixtures: an in-memory `ContentStore` double and builders
//! for seeding it.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use devforum_core::domain::{
    AuthorSummary, Interaction, InteractionAction, Question, QuestionSummary, Tag, TagRef,
    TagSummary, TargetKind, User,
};
use devforum_core::ports::{ContentStore, PortError, PortResult};
use devforum_core::query::{PageWindow, QuestionCriteria, QuestionSort, TagCriteria};
use uuid::Uuid;

/// An in-memory store backed by plain vectors. Matching and sorting follow
/// the criteria's own `matches` semantics, so this double and the SQL
/// adapter agree by construction on what a criteria value means.
#[derive(Default)]
pub struct MemoryStore {
    pub questions: Vec<Question>,
    pub tags: Vec<Tag>,
    pub users: Vec<User>,
    pub interactions: Vec<Interaction>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of store accesses across all methods.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn summarize(&self, question: &Question) -> PortResult<QuestionSummary> {
        let author = self
            .users
            .iter()
            .find(|u| u.id == question.author_id)
            .ok_or_else(|| PortError::NotFound(format!("User {}", question.author_id)))?;
        let tags = question
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.iter().find(|t| t.id == *id))
            .map(|t| TagRef {
                id: t.id,
                name: t.name.clone(),
            })
            .collect();
        Ok(QuestionSummary {
            id: question.id,
            title: question.title.clone(),
            content: question.content.clone(),
            author: AuthorSummary {
                id: author.id,
                name: author.name.clone(),
                image: author.image.clone(),
            },
            tags,
            created_at: question.created_at,
            upvotes: question.upvotes,
            downvotes: question.downvotes,
            answers: question.answers,
            views: question.views,
        })
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn count_questions(&self, criteria: &QuestionCriteria) -> PortResult<u64> {
        self.touch();
        Ok(self.questions.iter().filter(|q| criteria.matches(q)).count() as u64)
    }

    async fn find_questions(
        &self,
        criteria: &QuestionCriteria,
        sort: QuestionSort,
        window: PageWindow,
    ) -> PortResult<Vec<QuestionSummary>> {
        self.touch();
        let mut matched: Vec<&Question> =
            self.questions.iter().filter(|q| criteria.matches(q)).collect();
        match sort {
            QuestionSort::CreatedDesc => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            QuestionSort::UpvotesDesc => matched.sort_by(|a, b| {
                b.upvotes
                    .cmp(&a.upvotes)
                    .then(b.created_at.cmp(&a.created_at))
            }),
        }
        matched
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .map(|q| self.summarize(q))
            .collect()
    }

    async fn questions_by_ids(&self, ids: &[Uuid]) -> PortResult<Vec<Question>> {
        self.touch();
        Ok(self
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn interactions_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interaction>> {
        self.touch();
        Ok(self
            .interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_tags(&self, criteria: &TagCriteria) -> PortResult<u64> {
        self.touch();
        Ok(self.tags.iter().filter(|t| criteria.matches(t)).count() as u64)
    }

    async fn find_tags(
        &self,
        criteria: &TagCriteria,
        window: PageWindow,
    ) -> PortResult<Vec<TagSummary>> {
        self.touch();
        let mut matched: Vec<&Tag> = self.tags.iter().filter(|t| criteria.matches(t)).collect();
        matched.sort_by(|a, b| b.questions.cmp(&a.questions).then(a.name.cmp(&b.name)));
        Ok(matched
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .map(|t| TagSummary {
                id: t.id,
                name: t.name.clone(),
                questions: t.questions,
            })
            .collect())
    }
}

//=========================================================================================
// Seed builders
//=========================================================================================

pub fn user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        username: name.to_lowercase().replace(' ', ""),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        image: Some(format!("https://example.com/{}.jpg", name.to_lowercase())),
    }
}

pub fn tag(name: &str, questions: i64) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        questions,
    }
}

/// A question created `age_secs` seconds ago. Vote/answer/view counts start
/// at zero; tests adjust the fields they care about.
pub fn question(title: &str, content: &str, author: &User, tags: &[&Tag], age_secs: i64) -> Question {
    Question {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: content.to_string(),
        author_id: author.id,
        tag_ids: tags.iter().map(|t| t.id).collect(),
        created_at: Utc::now() - Duration::seconds(age_secs),
        upvotes: 0,
        downvotes: 0,
        answers: 0,
        views: 0,
    }
}

pub fn interaction(user: &User, action: InteractionAction, question: &Question) -> Interaction {
    Interaction {
        id: Uuid::new_v4(),
        user_id: user.id,
        action,
        action_id: question.id,
        action_type: TargetKind::Question,
    }
}
