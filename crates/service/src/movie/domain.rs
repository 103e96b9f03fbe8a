use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sea_orm::{FromQueryResult, Order};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{comment, movie};

/// Movie create/update input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieInput {
    pub title: String,
    pub description: String,
    #[serde(rename = "releaseDate", alias = "release_date")]
    pub release_date: NaiveDate,
}

/// Comment create/update input; `rate` becomes the stored rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentInput {
    pub content: String,
    pub rate: i32,
}

/// Movie with its comments attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieWithComments {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub comments: Vec<comment::Model>,
}

impl From<(movie::Model, Vec<comment::Model>)> for MovieWithComments {
    fn from((movie, comments): (movie::Model, Vec<comment::Model>)) -> Self {
        Self { movie, comments }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromQueryResult)]
pub struct MovieCommentCount {
    pub movie_id: Uuid,
    pub movie_title: String,
    pub total_comments: i64,
}

/// Average rating for a movie plus its grade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRating {
    pub movie_id: Uuid,
    pub movie_title: String,
    pub movie_rating: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromQueryResult)]
pub struct RatedMovie {
    pub movie_id: Uuid,
    pub movie_title: String,
    pub movie_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromQueryResult)]
pub struct MovieTitle {
    pub movie_id: Uuid,
    pub movie_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromQueryResult)]
pub struct MovieRelease {
    pub movie_id: Uuid,
    pub movie_title: String,
    pub release_date: NaiveDate,
}

/// Classification of an average rating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Grade {
    Great,
    Good,
    Average,
    Poor,
    #[serde(rename = "No Rating")]
    NoRating,
}

impl Grade {
    /// Thresholds are checked top to bottom; anything outside `[1, 5]` is `NoRating`.
    pub fn from_rating(rating: f64) -> Self {
        if (4.1..=5.0).contains(&rating) {
            Grade::Great
        } else if (3.0..4.1).contains(&rating) {
            Grade::Good
        } else if (2.0..3.0).contains(&rating) {
            Grade::Average
        } else if (1.0..2.0).contains(&rating) {
            Grade::Poor
        } else {
            Grade::NoRating
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Great => "Great",
            Grade::Good => "Good",
            Grade::Average => "Average",
            Grade::Poor => "Poor",
            Grade::NoRating => "No Rating",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Great" => Ok(Grade::Great),
            "Good" => Ok(Grade::Good),
            "Average" => Ok(Grade::Average),
            "Poor" => Ok(Grade::Poor),
            "No Rating" => Ok(Grade::NoRating),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_order(&self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }

    /// Parse an optional raw value, defaulting to ascending when absent or blank.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(SortDirection::default()),
            Some(v) => v.parse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("ASC"),
            SortDirection::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!("order must be ASC or DESC, got '{s}'")),
        }
    }
}

/// Criteria for the rated title search.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedMovieSearch {
    pub query: String,
    pub min_rating: Option<f64>,
    pub direction: SortDirection,
}

/// Criteria for the release date search; both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseDateSearch {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub direction: SortDirection,
}

/// Round half away from zero to two decimals, matching SQL `ROUND(x, 2)`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
