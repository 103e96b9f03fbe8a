use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait};

use super::memory_db;
use crate::seed::{seed_if_empty, SeedFixture};
use crate::{comment, movie};

const FIXTURE: &str = r#"{
    "movies": [
        { "title": "Inception", "description": "dreams", "releaseDate": "2010-07-16",
          "comments": [ { "content": "great", "rate": 5 }, { "content": "long", "rate": 3 } ] },
        { "title": "Nope", "releaseDate": "2022-07-22" }
    ]
}"#;

#[tokio::test]
async fn seed_loads_movies_and_comments_once() -> Result<()> {
    let db = memory_db().await?;
    let fixture = SeedFixture::parse(FIXTURE)?;

    let first = seed_if_empty(&db, &fixture).await?;
    assert_eq!((first.movies, first.comments, first.skipped), (2, 2, false));
    assert_eq!(movie::Entity::find().count(&db).await?, 2);
    assert_eq!(comment::Entity::find().count(&db).await?, 2);

    let again = seed_if_empty(&db, &fixture).await?;
    assert!(again.skipped);
    assert_eq!(movie::Entity::find().count(&db).await?, 2);

    let with = movie::Entity::find().find_with_related(comment::Entity).all(&db).await?;
    let (inception, comments) = with.iter().find(|(m, _)| m.title == "Inception").unwrap();
    assert_eq!(inception.description, "dreams");
    assert_eq!(comments.len(), 2);
    Ok(())
}

#[tokio::test]
async fn seed_skips_populated_store() -> Result<()> {
    let db = memory_db().await?;
    movie::create(&db, "Existing", "kept", chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).await?;

    let report = seed_if_empty(&db, &SeedFixture::parse(FIXTURE)?).await?;
    assert!(report.skipped);
    assert_eq!(movie::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[test]
fn fixture_rejects_out_of_range_rating() {
    let bad = r#"{"movies":[{"title":"X","releaseDate":"2001-01-01","comments":[{"content":"c","rate":7}]}]}"#;
    assert!(SeedFixture::parse(bad).unwrap_err().is_validation());
    assert!(SeedFixture::parse("{not json").unwrap_err().is_validation());
}

#[test]
fn bundled_fixture_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../seeds/movies.json");
    let fixture = SeedFixture::load(path).unwrap();
    assert_eq!(fixture.movies.len(), 3);
    assert!(fixture.movies.iter().any(|m| m.title == "Arrival"));
}
