//! Query builders for the movie reporting endpoints.
//!
//! Each builder wraps a `Select<movie::Entity>` and exposes one method per optional
//! clause, so callers accumulate filters and ordering step by step and finalize
//! with `into_select()`.

use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select};

use models::{comment, movie};

use super::domain::{RatedMovieSearch, ReleaseDateSearch, SortDirection};

/// `ROUND(AVG(rating), 2)` as a double; NULL when the movie has no comments.
pub fn rounded_avg_rating() -> SimpleExpr {
    Expr::cust(r#"CAST(ROUND(AVG("tb_comment"."rating"), 2) AS DOUBLE PRECISION)"#)
}

/// Same as [`rounded_avg_rating`] but 0 instead of NULL.
pub fn rounded_avg_rating_or_zero() -> SimpleExpr {
    Expr::cust(r#"CAST(COALESCE(ROUND(AVG("tb_comment"."rating"), 2), 0) AS DOUBLE PRECISION)"#)
}

const LIKE_ESCAPE: char = '\\';

/// `%needle%` for a substring match on a lower-cased column.
/// `%` and `_` in the needle match literally, escaped with [`LIKE_ESCAPE`].
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(tb_movie.title) LIKE '%needle%' ESCAPE '\'`
pub fn title_contains_ci(needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((movie::Entity, movie::Column::Title))))
        .like(LikeExpr::new(contains_pattern(needle)).escape(LIKE_ESCAPE))
}

/// Movies left-joined with comments, one row per movie with its rounded average.
pub struct RatedMovieQuery {
    select: Select<movie::Entity>,
}

impl RatedMovieQuery {
    pub fn new() -> Self {
        let select = movie::Entity::find()
            .select_only()
            .column_as(movie::Column::Id, "movie_id")
            .column_as(movie::Column::Title, "movie_title")
            .column_as(rounded_avg_rating_or_zero(), "movie_rating")
            .join(JoinType::LeftJoin, movie::Relation::Comments.def())
            .group_by(movie::Column::Id)
            .group_by(movie::Column::Title);
        Self { select }
    }

    /// Case-insensitive substring filter on the title. A blank needle matches every title.
    pub fn title_contains(mut self, needle: &str) -> Self {
        self.select = self.select.filter(title_contains_ci(needle));
        self
    }

    /// Keep movies whose average is at least `min`. Movies without comments never pass.
    pub fn min_rating(mut self, min: Option<f64>) -> Self {
        if let Some(min) = min {
            self.select = self.select.having(Expr::expr(rounded_avg_rating()).gte(min));
        }
        self
    }

    pub fn order_by_title(mut self, direction: SortDirection) -> Self {
        self.select = self.select.order_by(movie::Column::Title, direction.as_order());
        self
    }

    pub fn from_search(search: &RatedMovieSearch) -> Self {
        Self::new()
            .title_contains(&search.query)
            .min_rating(search.min_rating)
            .order_by_title(search.direction)
    }

    pub fn into_select(self) -> Select<movie::Entity> {
        self.select
    }
}

impl Default for RatedMovieQuery {
    fn default() -> Self { Self::new() }
}

/// Movie id, title and release date with optional inclusive date bounds.
pub struct ReleaseDateQuery {
    select: Select<movie::Entity>,
}

impl ReleaseDateQuery {
    pub fn new() -> Self {
        let select = movie::Entity::find()
            .select_only()
            .column_as(movie::Column::Id, "movie_id")
            .column_as(movie::Column::Title, "movie_title")
            .column_as(movie::Column::ReleaseDate, "release_date");
        Self { select }
    }

    pub fn released_from(mut self, start: Option<NaiveDate>) -> Self {
        if let Some(start) = start {
            self.select = self.select.filter(movie::Column::ReleaseDate.gte(start));
        }
        self
    }

    pub fn released_until(mut self, end: Option<NaiveDate>) -> Self {
        if let Some(end) = end {
            self.select = self.select.filter(movie::Column::ReleaseDate.lte(end));
        }
        self
    }

    pub fn order_by_release_date(mut self, direction: SortDirection) -> Self {
        self.select = self.select.order_by(movie::Column::ReleaseDate, direction.as_order());
        self
    }

    pub fn from_search(search: &ReleaseDateSearch) -> Self {
        Self::new()
            .released_from(search.start)
            .released_until(search.end)
            .order_by_release_date(search.direction)
    }

    pub fn into_select(self) -> Select<movie::Entity> {
        self.select
    }
}

impl Default for ReleaseDateQuery {
    fn default() -> Self { Self::new() }
}

/// Comment count per movie, including movies without comments.
pub fn comment_counts() -> Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .column_as(movie::Column::Id, "movie_id")
        .column_as(movie::Column::Title, "movie_title")
        .column_as(comment::Column::Id.count(), "total_comments")
        .join(JoinType::LeftJoin, movie::Relation::Comments.def())
        .group_by(movie::Column::Id)
        .group_by(movie::Column::Title)
}

/// Movie id and title ordered by title.
pub fn titles_sorted(direction: SortDirection) -> Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .column_as(movie::Column::Id, "movie_id")
        .column_as(movie::Column::Title, "movie_title")
        .order_by(movie::Column::Title, direction.as_order())
}

/// Grouped average per movie followed by the grade classification.
pub const RATINGS_WITH_GRADES_SQL: &str = r#"
WITH movie_ratings AS (
    SELECT
        tm.id AS movie_id,
        tm.title AS movie_title,
        COALESCE(ROUND(AVG(tc.rating), 2), 0) AS movie_rating
    FROM tb_movie tm
    LEFT JOIN tb_comment tc ON tm.id = tc.movie_id
    GROUP BY tm.id, tm.title
)
SELECT
    movie_id,
    movie_title,
    CAST(movie_rating AS DOUBLE PRECISION) AS movie_rating,
    CASE
        WHEN movie_rating >= 4.1 AND movie_rating <= 5 THEN 'Great'
        WHEN movie_rating >= 3 AND movie_rating < 4.1 THEN 'Good'
        WHEN movie_rating >= 2 AND movie_rating < 3 THEN 'Average'
        WHEN movie_rating >= 1 AND movie_rating < 2 THEN 'Poor'
        ELSE 'No Rating'
    END AS grade
FROM movie_ratings
"#;
