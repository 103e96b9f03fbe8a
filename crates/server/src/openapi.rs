use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MovieInputDoc {
    pub title: String,
    pub description: String,
    /// YYYY-MM-DD
    #[schema(rename = "releaseDate")]
    pub release_date: String,
}

#[derive(ToSchema)]
pub struct CommentInputDoc {
    pub content: String,
    /// 1 to 5
    pub rate: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::root,
        crate::routes::movies::create,
        crate::routes::movies::list,
        crate::routes::movies::get,
        crate::routes::movies::update,
        crate::routes::movies::delete,
        crate::routes::movies::search_by_title,
        crate::routes::movies::avg_rating,
        crate::routes::movies::comment_counts,
        crate::routes::movies::ratings,
        crate::routes::movies::search_dynamic,
        crate::routes::movies::sorted_by_name,
        crate::routes::movies::by_release_date,
        crate::routes::comments::create,
        crate::routes::comments::get,
        crate::routes::comments::update,
        crate::routes::comments::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MovieInputDoc,
            CommentInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "movie"),
        (name = "comment"),
        (name = "report")
    )
)]
pub struct ApiDoc;
