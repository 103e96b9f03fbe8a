//! Startup fixture for `tb_movie` / `tb_comment`.
//!
//! The fixture is JSON shaped like the request bodies: movies carry `releaseDate`
//! and their comments carry `rate`. Loading is skipped once the store holds movies,
//! so restarting with `database.seed_on_start` never duplicates rows.

use std::path::Path;

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use tracing::info;

use crate::errors::ModelError;
use crate::{comment, movie};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFixture {
    #[serde(default)]
    pub movies: Vec<SeedMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedMovie {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "releaseDate", alias = "release_date")]
    pub release_date: NaiveDate,
    #[serde(default)]
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedComment {
    pub content: String,
    #[serde(rename = "rate", alias = "rating")]
    pub rating: i32,
}

/// Rows written by [`seed_if_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub movies: usize,
    pub comments: usize,
    pub skipped: bool,
}

impl SeedFixture {
    pub fn parse(content: &str) -> Result<Self, ModelError> {
        let fixture: SeedFixture = serde_json::from_str(content)
            .map_err(|e| ModelError::Validation(format!("invalid seed fixture: {e}")))?;
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading seed fixture {}: {e}", path.display()))?;
        Ok(Self::parse(&content)?)
    }

    // same rules as request bodies
    fn validate(&self) -> Result<(), ModelError> {
        for m in &self.movies {
            movie::validate_title(&m.title)?;
            for c in &m.comments {
                comment::validate_content(&c.content)?;
                comment::validate_rating(c.rating)?;
            }
        }
        Ok(())
    }
}

/// Insert every fixture movie and its comments unless `tb_movie` already has rows.
pub async fn seed_if_empty(db: &DatabaseConnection, fixture: &SeedFixture) -> Result<SeedReport, ModelError> {
    let existing = movie::Entity::find()
        .count(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    if existing > 0 {
        info!(existing, "tb_movie already populated, seed skipped");
        return Ok(SeedReport { skipped: true, ..SeedReport::default() });
    }

    let mut report = SeedReport::default();
    for m in &fixture.movies {
        let created = movie::create(db, &m.title, &m.description, m.release_date).await?;
        report.movies += 1;
        for c in &m.comments {
            comment::create(db, created.id, &c.content, c.rating).await?;
            report.comments += 1;
        }
    }
    info!(movies = report.movies, comments = report.comments, "seed fixture loaded");
    Ok(report)
}
