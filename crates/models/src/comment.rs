use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub content: String,
    pub rating: i32,
    pub movie_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id"
    )]
    Movie,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn validate_content(content: &str) -> Result<(), errors::ModelError> {
    if content.trim().is_empty() {
        return Err(errors::ModelError::Validation("content required".into()));
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> Result<(), errors::ModelError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(errors::ModelError::Validation(format!(
            "rate must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Insert a comment for `movie_id`. The caller is responsible for the movie existing.
pub async fn create(
    db: &DatabaseConnection,
    movie_id: Uuid,
    content: &str,
    rating: i32,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        content: Set(content.to_string()),
        rating: Set(rating),
        movie_id: Set(movie_id),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
