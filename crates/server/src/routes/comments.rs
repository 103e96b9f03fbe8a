use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use models::comment;
use service::movie::domain::CommentInput;

use crate::errors::JsonApiError;
use crate::extract::{AppJson, AppPath};
use crate::routes::movies::Affected;
use crate::state::ServerState;

fn validate(input: &CommentInput) -> Result<(), JsonApiError> {
    comment::validate_content(&input.content)?;
    comment::validate_rating(input.rate)?;
    Ok(())
}

#[utoipa::path(post, path = "/api/v1/movie/{id}/comment", tag = "comment", params(("id" = Uuid, Path, description = "Movie id")), request_body = crate::openapi::CommentInputDoc, responses((status = 201, description = "Created"), (status = 404, description = "Movie not found")))]
pub async fn create(State(state): State<ServerState>, AppPath(movie_id): AppPath<Uuid>, AppJson(input): AppJson<CommentInput>) -> Result<(StatusCode, Json<comment::Model>), JsonApiError> {
    validate(&input)?;
    let created = state.movies.add_comment(movie_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/comment/{id}", tag = "comment", params(("id" = Uuid, Path, description = "Comment id")), responses((status = 200, description = "Comment"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>) -> Result<Json<comment::Model>, JsonApiError> {
    state.movies.get_comment_by_id(id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("comment not found"))
}

#[utoipa::path(put, path = "/api/v1/comment/{id}", tag = "comment", params(("id" = Uuid, Path, description = "Comment id")), request_body = crate::openapi::CommentInputDoc, responses((status = 200, description = "Updated comment"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>, AppJson(input): AppJson<CommentInput>) -> Result<Json<comment::Model>, JsonApiError> {
    validate(&input)?;
    Ok(Json(state.movies.update_comment(id, &input).await?))
}

#[utoipa::path(delete, path = "/api/v1/comment/{id}", tag = "comment", params(("id" = Uuid, Path, description = "Comment id")), responses((status = 200, description = "Rows affected")))]
pub async fn delete(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>) -> Result<Json<Affected>, JsonApiError> {
    let affected = state.movies.delete_comment(id).await?;
    Ok(Json(Affected { affected }))
}
