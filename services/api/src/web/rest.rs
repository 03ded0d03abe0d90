//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use devforum_core::domain::{QuestionSummary, TagSummary};
use devforum_core::listing::ListError;
use devforum_core::query::{QuestionQuery, TagQuery};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_questions_handler,
        list_tags_handler,
    ),
    components(
        schemas(QuestionsResponse, TagsResponse)
    ),
    tags(
        (name = "DevForum API", description = "Read endpoints for browsing forum questions and tags.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// One page of question summaries.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
    #[schema(value_type = Vec<Object>)]
    questions: Vec<QuestionSummary>,
    is_next: bool,
}

/// One page of tag summaries.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    #[schema(value_type = Vec<Object>)]
    tags: Vec<TagSummary>,
    is_next: bool,
}

/// Reads the caller identity from the optional `x-user-id` header.
/// A missing or malformed header means the request is unauthenticated,
/// which is a valid input, not an error.
fn caller_identity(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

fn list_error_response(err: ListError) -> (StatusCode, String) {
    match err {
        ListError::Invalid(v) => (StatusCode::BAD_REQUEST, v.to_string()),
        ListError::Store(e) => {
            error!("Store error while serving a listing: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List questions, paginated, with optional search and filter.
#[utoipa::path(
    get,
    path = "/questions",
    responses(
        (status = 200, description = "One page of matching questions", body = QuestionsResponse),
        (status = 400, description = "Invalid page, page size, or filter"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("page" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("pageSize" = Option<i64>, Query, description = "Items per page (default 10)"),
        ("query" = Option<String>, Query, description = "Case-insensitive substring match against title or content"),
        ("filter" = Option<String>, Query, description = "One of: newest, unanswered, popular, recommended"),
        ("x-user-id" = Option<Uuid>, Header, description = "Caller identity; consulted only by the recommended filter")
    )
)]
pub async fn list_questions_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<QuestionQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let caller = caller_identity(&headers);
    let page = app_state
        .engine
        .list_questions(query, caller)
        .await
        .map_err(list_error_response)?;
    Ok((
        StatusCode::OK,
        Json(QuestionsResponse {
            questions: page.items,
            is_next: page.has_next,
        }),
    ))
}

/// List tags, paginated, ordered by usage, with optional name search.
#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "One page of matching tags", body = TagsResponse),
        (status = 400, description = "Invalid page or page size"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("page" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("pageSize" = Option<i64>, Query, description = "Items per page (default 10)"),
        ("query" = Option<String>, Query, description = "Case-insensitive substring match against the tag name")
    )
)]
pub async fn list_tags_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<TagQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page = app_state
        .engine
        .list_tags(query)
        .await
        .map_err(list_error_response)?;
    Ok((
        StatusCode::OK,
        Json(TagsResponse {
            tags: page.items,
            is_next: page.has_next,
        }),
    ))
}
