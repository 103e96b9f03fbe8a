use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, instrument};
use uuid::Uuid;

use models::{comment, movie};

use crate::errors::ServiceError;
use crate::movie::domain::{
    CommentInput, MovieCommentCount, MovieInput, MovieRating, MovieRelease, MovieTitle,
    MovieWithComments, RatedMovie, RatedMovieSearch, ReleaseDateSearch, SortDirection,
};
use crate::movie::repository::{CommentRepository, MovieRepository};

/// Application service encapsulating movie and comment business rules.
///
/// Existence checks follow a per-entity policy: movie update/delete write blindly and
/// report affected rows, comment update and comment creation verify the target first.
/// Check and write are separate store round-trips with no transaction around them.
pub struct MovieCommentService<M: MovieRepository, C: CommentRepository> {
    movies: Arc<M>,
    comments: Arc<C>,
}

impl<M: MovieRepository, C: CommentRepository> MovieCommentService<M, C> {
    pub fn new(movies: Arc<M>, comments: Arc<C>) -> Self { Self { movies, comments } }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn save_movie(&self, input: &MovieInput) -> Result<movie::Model, ServiceError> {
        let created = self.movies.save(input).await?;
        info!(movie_id = %created.id, "movie_created");
        Ok(created)
    }

    /// No existence check; an unknown id affects zero rows.
    #[instrument(skip(self, input), fields(movie_id = %id))]
    pub async fn update_movie(&self, id: Uuid, input: &MovieInput) -> Result<u64, ServiceError> {
        let affected = self.movies.update(id, input).await?;
        info!(affected, "movie_updated");
        Ok(affected)
    }

    pub async fn get_movies(&self) -> Result<Vec<MovieWithComments>, ServiceError> {
        self.movies.find_all().await
    }

    pub async fn get_movie_by_id(&self, id: Uuid) -> Result<Option<MovieWithComments>, ServiceError> {
        self.movies.find_by_id(id).await
    }

    /// Comments of the movie are left untouched.
    #[instrument(skip(self), fields(movie_id = %id))]
    pub async fn delete_movie(&self, id: Uuid) -> Result<u64, ServiceError> {
        let affected = self.movies.delete(id).await?;
        info!(affected, "movie_deleted");
        Ok(affected)
    }

    /// Case-insensitive substring search. Store failures are logged and replaced by a generic error.
    pub async fn get_movies_by_title(&self, title: &str) -> Result<Vec<movie::Model>, ServiceError> {
        if title.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("title is required".into()));
        }
        self.movies.find_by_title_contains(title).await.map_err(|e| {
            error!(error = %e, code = e.code(), %title, "get_movies_by_title failed");
            ServiceError::QueryFailed("failed to fetch movies by title".into())
        })
    }

    #[instrument(skip(self, input), fields(movie_id = %movie_id))]
    pub async fn add_comment(&self, movie_id: Uuid, input: &CommentInput) -> Result<comment::Model, ServiceError> {
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(ServiceError::not_found("movie"));
        }
        let created = self.comments.save(movie_id, input).await?;
        info!(comment_id = %created.id, "comment_created");
        Ok(created)
    }

    pub async fn get_comment_by_id(&self, id: Uuid) -> Result<Option<comment::Model>, ServiceError> {
        self.comments.find_by_id(id).await
    }

    #[instrument(skip(self, input), fields(comment_id = %id))]
    pub async fn update_comment(&self, id: Uuid, input: &CommentInput) -> Result<comment::Model, ServiceError> {
        let mut found = self.comments.find_by_id(id).await?
            .ok_or_else(|| ServiceError::not_found("comment"))?;
        found.content = input.content.clone();
        found.rating = input.rate;
        self.comments.update(id, &found).await?;
        info!("comment_updated");
        Ok(found)
    }

    /// Unconditional delete; returns affected rows.
    #[instrument(skip(self), fields(comment_id = %id))]
    pub async fn delete_comment(&self, id: Uuid) -> Result<u64, ServiceError> {
        let affected = self.comments.delete(id).await?;
        info!(affected, "comment_deleted");
        Ok(affected)
    }

    pub async fn get_avg_rating_by_movie_id(&self, movie_id: Uuid) -> Result<f64, ServiceError> {
        self.comments.average_rating(movie_id).await
    }

    pub async fn get_total_comment_from_each_movie(&self) -> Result<Vec<MovieCommentCount>, ServiceError> {
        self.movies.comment_counts().await
    }

    pub async fn get_movies_with_ratings_and_grades(&self) -> Result<Vec<MovieRating>, ServiceError> {
        self.movies.ratings_with_grades().await
    }

    /// The title filter always applies; `min_rating` only when given.
    pub async fn search_movies_with_dynamic_conditions(
        &self,
        search_query: &str,
        min_rating: Option<f64>,
        direction: SortDirection,
    ) -> Result<Vec<RatedMovie>, ServiceError> {
        let search = RatedMovieSearch { query: search_query.to_string(), min_rating, direction };
        self.movies.search_rated(&search).await
    }

    pub async fn get_movies_sorted_by_name(&self, direction: SortDirection) -> Result<Vec<MovieTitle>, ServiceError> {
        self.movies.titles_sorted(direction).await
    }

    pub async fn search_movies_by_release_date(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        direction: SortDirection,
    ) -> Result<Vec<MovieRelease>, ServiceError> {
        self.movies.search_by_release_date(&ReleaseDateSearch { start, end, direction }).await
    }
}
