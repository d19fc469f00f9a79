use axum::{extract::State, http::StatusCode, Json};
use models::{AddRequest, Post, Posts, SetFavoriteRequest};

use crate::{errors::ApiError, state::ServerState};

#[utoipa::path(
    get, path = "/posts", tag = "posts", operation_id = "getPosts",
    responses(
        (status = 200, description = "All posts", body = crate::openapi::PostsDoc),
        (status = 401, description = "Referer unauthorized"),
        (status = 500, description = "Store error")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Posts>, ApiError> {
    Ok(Json(state.posts.list().await?))
}

#[utoipa::path(
    post, path = "/posts", tag = "posts", operation_id = "addPost",
    request_body = crate::openapi::AddRequestDoc,
    responses(
        (status = 200, description = "Created post", body = crate::openapi::PostDoc),
        (status = 401, description = "Referer unauthorized"),
        (status = 500, description = "Store error")
    )
)]
pub async fn add(State(state): State<ServerState>, Json(req): Json<AddRequest>) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.add(req).await?))
}

#[utoipa::path(
    put, path = "/posts", tag = "posts", operation_id = "setFavorite",
    request_body = crate::openapi::SetFavoriteRequestDoc,
    responses(
        (status = 204, description = "Favorite flag updated"),
        (status = 401, description = "Referer unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Store error")
    )
)]
pub async fn set_favorite(
    State(state): State<ServerState>,
    Json(req): Json<SetFavoriteRequest>,
) -> Result<StatusCode, ApiError> {
    state.posts.set_favorite(req).await?;
    Ok(StatusCode::NO_CONTENT)
}
