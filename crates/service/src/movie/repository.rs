use async_trait::async_trait;
use uuid::Uuid;

use models::{comment, movie};

use super::domain::{
    CommentInput, MovieCommentCount, MovieInput, MovieRating, MovieRelease, MovieTitle,
    MovieWithComments, RatedMovie, RatedMovieSearch, ReleaseDateSearch, SortDirection,
};
use crate::errors::ServiceError;

/// Movie accessor: persistence plus the joined/grouped reporting queries.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MovieWithComments>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<MovieWithComments>, ServiceError>;
    async fn save(&self, input: &MovieInput) -> Result<movie::Model, ServiceError>;
    /// Returns the number of rows touched; an unknown id yields 0.
    async fn update(&self, id: Uuid, input: &MovieInput) -> Result<u64, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError>;
    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<movie::Model>, ServiceError>;

    async fn comment_counts(&self) -> Result<Vec<MovieCommentCount>, ServiceError>;
    async fn ratings_with_grades(&self) -> Result<Vec<MovieRating>, ServiceError>;
    async fn search_rated(&self, search: &RatedMovieSearch) -> Result<Vec<RatedMovie>, ServiceError>;
    async fn titles_sorted(&self, direction: SortDirection) -> Result<Vec<MovieTitle>, ServiceError>;
    async fn search_by_release_date(&self, search: &ReleaseDateSearch) -> Result<Vec<MovieRelease>, ServiceError>;
}

/// Comment accessor.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<comment::Model>, ServiceError>;
    async fn save(&self, movie_id: Uuid, input: &CommentInput) -> Result<comment::Model, ServiceError>;
    async fn update(&self, id: Uuid, comment: &comment::Model) -> Result<(), ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError>;
    /// Rounded mean of the movie's ratings, 0 when it has none.
    async fn average_rating(&self, movie_id: Uuid) -> Result<f64, ServiceError>;
}
