use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use models::movie;
use service::movie::domain::{
    MovieCommentCount, MovieInput, MovieRating, MovieRelease, MovieTitle, MovieWithComments,
    RatedMovie, SortDirection,
};

use crate::errors::JsonApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct TitleQuery { pub title: Option<String> }

#[derive(Debug, Deserialize)]
pub struct OrderQuery { pub order: Option<String> }

#[derive(Debug, Deserialize)]
pub struct DynamicSearchQuery {
    pub q: Option<String>,
    pub min_rating: Option<f64>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseDateQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Affected { pub affected: u64 }

#[derive(Debug, Serialize, Deserialize)]
pub struct AvgRating { pub movie_id: Uuid, pub avg_rating: f64 }

pub(crate) fn parse_order(raw: Option<&str>) -> Result<SortDirection, JsonApiError> {
    SortDirection::parse_or_default(raw).map_err(JsonApiError::bad_request)
}

fn validate(input: &MovieInput) -> Result<(), JsonApiError> {
    movie::validate_title(&input.title)?;
    Ok(())
}

#[utoipa::path(post, path = "/api/v1/movie", tag = "movie", request_body = crate::openapi::MovieInputDoc, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request")))]
pub async fn create(State(state): State<ServerState>, AppJson(input): AppJson<MovieInput>) -> Result<(StatusCode, Json<movie::Model>), JsonApiError> {
    validate(&input)?;
    let created = state.movies.save_movie(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/movie", tag = "movie", responses((status = 200, description = "All movies with their comments")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<MovieWithComments>>, JsonApiError> {
    let list = state.movies.get_movies().await?;
    info!(count = list.len(), "list movies");
    Ok(Json(list))
}

#[utoipa::path(get, path = "/api/v1/movie/{id}", tag = "movie", params(("id" = Uuid, Path, description = "Movie id")), responses((status = 200, description = "Movie with comments"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>) -> Result<Json<MovieWithComments>, JsonApiError> {
    state.movies.get_movie_by_id(id).await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("movie not found"))
}

#[utoipa::path(put, path = "/api/v1/movie/{id}", tag = "movie", params(("id" = Uuid, Path, description = "Movie id")), request_body = crate::openapi::MovieInputDoc, responses((status = 200, description = "Rows affected")))]
pub async fn update(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>, AppJson(input): AppJson<MovieInput>) -> Result<Json<Affected>, JsonApiError> {
    validate(&input)?;
    let affected = state.movies.update_movie(id, &input).await?;
    Ok(Json(Affected { affected }))
}

#[utoipa::path(delete, path = "/api/v1/movie/{id}", tag = "movie", params(("id" = Uuid, Path, description = "Movie id")), responses((status = 200, description = "Rows affected")))]
pub async fn delete(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>) -> Result<Json<Affected>, JsonApiError> {
    let affected = state.movies.delete_movie(id).await?;
    Ok(Json(Affected { affected }))
}

#[utoipa::path(get, path = "/api/v1/movie/search", tag = "movie", params(("title" = String, Query, description = "Substring of the title")), responses((status = 200, description = "Matching movies"), (status = 400, description = "Blank title")))]
pub async fn search_by_title(State(state): State<ServerState>, AppQuery(q): AppQuery<TitleQuery>) -> Result<Json<Vec<movie::Model>>, JsonApiError> {
    let title = q.title.unwrap_or_default();
    Ok(Json(state.movies.get_movies_by_title(&title).await?))
}

#[utoipa::path(get, path = "/api/v1/movie/{id}/avg-rating", tag = "report", params(("id" = Uuid, Path, description = "Movie id")), responses((status = 200, description = "Rounded average rating, 0 without comments")))]
pub async fn avg_rating(State(state): State<ServerState>, AppPath(id): AppPath<Uuid>) -> Result<Json<AvgRating>, JsonApiError> {
    let avg_rating = state.movies.get_avg_rating_by_movie_id(id).await?;
    Ok(Json(AvgRating { movie_id: id, avg_rating }))
}

#[utoipa::path(get, path = "/api/v1/movie/comment-counts", tag = "report", responses((status = 200, description = "Comment count per movie")))]
pub async fn comment_counts(State(state): State<ServerState>) -> Result<Json<Vec<MovieCommentCount>>, JsonApiError> {
    Ok(Json(state.movies.get_total_comment_from_each_movie().await?))
}

#[utoipa::path(get, path = "/api/v1/movie/ratings", tag = "report", responses((status = 200, description = "Average rating and grade per movie")))]
pub async fn ratings(State(state): State<ServerState>) -> Result<Json<Vec<MovieRating>>, JsonApiError> {
    Ok(Json(state.movies.get_movies_with_ratings_and_grades().await?))
}

#[utoipa::path(get, path = "/api/v1/movie/search/dynamic", tag = "report", params(("q" = Option<String>, Query, description = "Title substring"), ("min_rating" = Option<f64>, Query, description = "Minimum average rating"), ("order" = Option<String>, Query, description = "ASC or DESC")), responses((status = 200, description = "Rated movies ordered by title")))]
pub async fn search_dynamic(State(state): State<ServerState>, AppQuery(q): AppQuery<DynamicSearchQuery>) -> Result<Json<Vec<RatedMovie>>, JsonApiError> {
    let direction = parse_order(q.order.as_deref())?;
    let query = q.q.unwrap_or_default();
    Ok(Json(state.movies.search_movies_with_dynamic_conditions(&query, q.min_rating, direction).await?))
}

#[utoipa::path(get, path = "/api/v1/movie/sorted", tag = "report", params(("order" = Option<String>, Query, description = "ASC or DESC")), responses((status = 200, description = "Movie ids and titles ordered by title")))]
pub async fn sorted_by_name(State(state): State<ServerState>, AppQuery(q): AppQuery<OrderQuery>) -> Result<Json<Vec<MovieTitle>>, JsonApiError> {
    let direction = parse_order(q.order.as_deref())?;
    Ok(Json(state.movies.get_movies_sorted_by_name(direction).await?))
}

#[utoipa::path(get, path = "/api/v1/movie/release-date", tag = "report", params(("start_date" = Option<String>, Query, description = "Inclusive lower bound, YYYY-MM-DD"), ("end_date" = Option<String>, Query, description = "Inclusive upper bound, YYYY-MM-DD"), ("order" = Option<String>, Query, description = "ASC or DESC")), responses((status = 200, description = "Movies ordered by release date")))]
pub async fn by_release_date(State(state): State<ServerState>, AppQuery(q): AppQuery<ReleaseDateQuery>) -> Result<Json<Vec<MovieRelease>>, JsonApiError> {
    let direction = parse_order(q.order.as_deref())?;
    Ok(Json(state.movies.search_movies_by_release_date(q.start_date, q.end_date, direction).await?))
}
