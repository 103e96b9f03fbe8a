use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect, Statement,
};
use tracing::{debug, warn};
use uuid::Uuid;

use models::{comment, movie};

use crate::errors::ServiceError;
use crate::movie::domain::{
    CommentInput, Grade, MovieCommentCount, MovieInput, MovieRating, MovieRelease, MovieTitle,
    MovieWithComments, RatedMovie, RatedMovieSearch, ReleaseDateSearch, SortDirection,
};
use crate::movie::query::{self, RatedMovieQuery, ReleaseDateQuery};
use crate::movie::repository::{CommentRepository, MovieRepository};

/// SeaORM-backed movie accessor.
pub struct SeaOrmMovieRepository {
    pub db: DatabaseConnection,
}

/// SeaORM-backed comment accessor.
pub struct SeaOrmCommentRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct MovieRatingRow {
    movie_id: Uuid,
    movie_title: String,
    movie_rating: f64,
    grade: String,
}

impl From<MovieRatingRow> for MovieRating {
    fn from(row: MovieRatingRow) -> Self {
        let grade = Grade::from_str(&row.grade).unwrap_or_else(|e| {
            warn!(error = %e, movie_id = %row.movie_id, "unexpected grade label; reclassifying");
            Grade::from_rating(row.movie_rating)
        });
        MovieRating { movie_id: row.movie_id, movie_title: row.movie_title, movie_rating: row.movie_rating, grade }
    }
}

#[derive(Debug, FromQueryResult)]
struct AvgRatingRow {
    avg_rating: Option<f64>,
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MovieWithComments>, ServiceError> {
        let rows = movie::Entity::find_by_id(id)
            .find_with_related(comment::Entity)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().next().map(MovieWithComments::from))
    }

    async fn find_all(&self) -> Result<Vec<MovieWithComments>, ServiceError> {
        let rows = movie::Entity::find()
            .find_with_related(comment::Entity)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(MovieWithComments::from).collect())
    }

    async fn save(&self, input: &MovieInput) -> Result<movie::Model, ServiceError> {
        let created = models::movie::create(&self.db, &input.title, &input.description, input.release_date).await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, input: &MovieInput) -> Result<u64, ServiceError> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Title, Expr::value(input.title.clone()))
            .col_expr(movie::Column::Description, Expr::value(input.description.clone()))
            .col_expr(movie::Column::ReleaseDate, Expr::value(input.release_date))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
        let res = movie::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected)
    }

    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<movie::Model>, ServiceError> {
        movie::Entity::find()
            .filter(query::title_contains_ci(needle))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn comment_counts(&self) -> Result<Vec<MovieCommentCount>, ServiceError> {
        query::comment_counts()
            .into_model::<MovieCommentCount>()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn ratings_with_grades(&self) -> Result<Vec<MovieRating>, ServiceError> {
        let stmt = Statement::from_string(self.db.get_database_backend(), query::RATINGS_WITH_GRADES_SQL);
        let rows = MovieRatingRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(MovieRating::from).collect())
    }

    async fn search_rated(&self, search: &RatedMovieSearch) -> Result<Vec<RatedMovie>, ServiceError> {
        debug!(query = %search.query, min_rating = ?search.min_rating, order = %search.direction, "search rated movies");
        RatedMovieQuery::from_search(search)
            .into_select()
            .into_model::<RatedMovie>()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn titles_sorted(&self, direction: SortDirection) -> Result<Vec<MovieTitle>, ServiceError> {
        query::titles_sorted(direction)
            .into_model::<MovieTitle>()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn search_by_release_date(&self, search: &ReleaseDateSearch) -> Result<Vec<MovieRelease>, ServiceError> {
        debug!(start = ?search.start, end = ?search.end, order = %search.direction, "search movies by release date");
        ReleaseDateQuery::from_search(search)
            .into_select()
            .into_model::<MovieRelease>()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<comment::Model>, ServiceError> {
        comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn save(&self, movie_id: Uuid, input: &CommentInput) -> Result<comment::Model, ServiceError> {
        let created = models::comment::create(&self.db, movie_id, &input.content, input.rate).await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, comment: &comment::Model) -> Result<(), ServiceError> {
        comment::Entity::update_many()
            .col_expr(comment::Column::Content, Expr::value(comment.content.clone()))
            .col_expr(comment::Column::Rating, Expr::value(comment.rating))
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
        let res = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected)
    }

    async fn average_rating(&self, movie_id: Uuid) -> Result<f64, ServiceError> {
        let row = comment::Entity::find()
            .select_only()
            .column_as(query::rounded_avg_rating(), "avg_rating")
            .filter(comment::Column::MovieId.eq(movie_id))
            .into_model::<AvgRatingRow>()
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(row.and_then(|r| r.avg_rating).unwrap_or(0.0))
    }
}
