use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::movie::repo::seaorm::{SeaOrmCommentRepository, SeaOrmMovieRepository};
use service::movie::MovieCommentService;

pub type AppService = MovieCommentService<SeaOrmMovieRepository, SeaOrmCommentRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub movies: Arc<AppService>,
    pub environment: Arc<str>,
}

impl ServerState {
    /// Wire both SeaORM accessors over one shared connection pool.
    pub fn new(db: DatabaseConnection, environment: &str) -> Self {
        let movie_repo = Arc::new(SeaOrmMovieRepository { db: db.clone() });
        let comment_repo = Arc::new(SeaOrmCommentRepository { db });
        Self {
            movies: Arc::new(MovieCommentService::new(movie_repo, comment_repo)),
            environment: Arc::from(environment),
        }
    }
}
