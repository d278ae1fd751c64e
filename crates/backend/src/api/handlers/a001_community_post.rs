use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use contracts::domain::a001_community_post::aggregate::{
    CommunityPost, CommunityPostId, CommunityPostResource, CreateCommunityPostDto,
    UpdateCommunityPostDto,
};
use contracts::shared::validation::ValidationErrors;
use serde::Deserialize;

use super::{deleted, found, pick_filter, SearchQuery};
use crate::domain::a001_community_post::service::{self, PostFilter};
use crate::shared::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    pub user: Option<String>,
}

impl PostQuery {
    fn into_filter(self) -> Result<PostFilter, ValidationErrors> {
        pick_filter(PostFilter::All, [self.user.map(PostFilter::User)])
    }
}

fn resources(posts: &[CommunityPost]) -> Vec<CommunityPostResource> {
    posts.iter().map(CommunityPostResource::from).collect()
}

/// POST /api/v1/community/posts
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateCommunityPostDto>,
) -> Result<(StatusCode, Json<CommunityPostResource>), ServiceError> {
    let post = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(CommunityPostResource::from(&post))))
}

/// GET /api/v1/community/posts[?user=]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> Result<Json<Vec<CommunityPostResource>>, ServiceError> {
    let posts = service::list(&state.db, query.into_filter()?).await?;
    Ok(Json(resources(&posts)))
}

/// GET /api/v1/community/posts/search?keyword=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CommunityPostResource>>, ServiceError> {
    let posts = service::list(&state.db, PostFilter::DescriptionContaining(query.keyword)).await?;
    Ok(Json(resources(&posts)))
}

/// GET /api/v1/community/posts/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let post = service::get_by_id(&state.db, CommunityPostId(id)).await?;
    Ok(found(post.as_ref().map(CommunityPostResource::from)))
}

/// PUT /api/v1/community/posts/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<UpdateCommunityPostDto>,
) -> Result<Response, ServiceError> {
    let post = service::update(&state.db, CommunityPostId(id), dto).await?;
    Ok(found(post.as_ref().map(CommunityPostResource::from)))
}

/// DELETE /api/v1/community/posts/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    Ok(deleted(service::delete(&state.db, CommunityPostId(id)).await?))
}
