use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use models::db::{connect_with_config, create_schema, DatabaseConfig};

struct TestApp {
    base_url: String,
}

fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    }
}

/// Serve the full router over a private in-memory SQLite store on an ephemeral port.
async fn start_server(environment: &str) -> anyhow::Result<TestApp> {
    let db = connect_with_config(&memory_config()).await?;
    create_schema(&db).await?;
    serve(db, environment).await
}

async fn serve(db: sea_orm::DatabaseConnection, environment: &str) -> anyhow::Result<TestApp> {
    let app = server::build_app(db, environment);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_movie(app: &TestApp, title: &str, released: &str) -> anyhow::Result<Value> {
    let res = client().post(format!("{}/api/v1/movie", app.base_url))
        .json(&json!({"title": title, "description": format!("about {title}"), "releaseDate": released}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

async fn add_comment(app: &TestApp, movie_id: &str, rate: i32) -> anyhow::Result<reqwest::Response> {
    Ok(client().post(format!("{}/api/v1/movie/{}/comment", app.base_url, movie_id))
        .json(&json!({"content": format!("rated {rate}"), "rate": rate}))
        .send().await?)
}

#[tokio::test]
async fn e2e_health_and_greeting() -> anyhow::Result<()> {
    let app = start_server("dev").await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");

    let res = client().get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?["msg"], "Hello,  Development Environment");
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_lists_movie_paths() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let doc = client().get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?.json::<Value>().await?;
    assert!(doc["paths"]["/api/v1/movie"].is_object());
    assert!(doc["paths"]["/api/v1/comment/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_movie_crud_round_trip() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let c = client();

    let created = create_movie(&app, "Inception", "2010-07-16").await?;
    let id = created["id"].as_str().unwrap().to_string();

    let found = c.get(format!("{}/api/v1/movie/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(found["title"], "Inception");
    assert_eq!(found["description"], "about Inception");
    assert_eq!(found["release_date"], "2010-07-16");
    assert_eq!(found["comments"], json!([]));

    let res = c.put(format!("{}/api/v1/movie/{}", app.base_url, id))
        .json(&json!({"title": "Inception (IMAX)", "description": "again", "releaseDate": "2010-07-17"}))
        .send().await?;
    assert_eq!(res.json::<Value>().await?["affected"], 1);

    let res = c.delete(format!("{}/api/v1/movie/{}", app.base_url, id)).send().await?;
    assert_eq!(res.json::<Value>().await?["affected"], 1);

    let res = c.get(format!("{}/api/v1/movie/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_movie_validation() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let res = client().post(format!("{}/api/v1/movie", app.base_url))
        .json(&json!({"title": "  ", "description": "x", "releaseDate": "2010-07-16"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client().get(format!("{}/api/v1/movie/search?title=%20", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = client().get(format!("{}/api/v1/movie/sorted?order=sideways", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_comment_flow() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let c = client();

    let res = add_comment(&app, "00000000-0000-0000-0000-000000000000", 4).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let movie = create_movie(&app, "Arrival", "2016-11-11").await?;
    let movie_id = movie["id"].as_str().unwrap().to_string();

    let res = add_comment(&app, &movie_id, 9).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = add_comment(&app, &movie_id, 4).await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let comment = res.json::<Value>().await?;
    let comment_id = comment["id"].as_str().unwrap().to_string();
    assert_eq!(comment["movie_id"], movie_id.as_str());

    let res = c.put(format!("{}/api/v1/comment/{}", app.base_url, comment_id))
        .json(&json!({"content": "even better", "rate": 5}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let fetched = c.get(format!("{}/api/v1/comment/{}", app.base_url, comment_id)).send().await?.json::<Value>().await?;
    assert_eq!(fetched["content"], "even better");
    assert_eq!(fetched["rating"], 5);

    let res = c.put(format!("{}/api/v1/comment/00000000-0000-0000-0000-000000000000", app.base_url))
        .json(&json!({"content": "ghost", "rate": 3}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/api/v1/comment/{}", app.base_url, comment_id)).send().await?;
    assert_eq!(res.json::<Value>().await?["affected"], 1);
    let res = c.get(format!("{}/api/v1/comment/{}", app.base_url, comment_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_reports() -> anyhow::Result<()> {
    let app = start_server("prod").await?;
    let c = client();

    let inception = create_movie(&app, "Inception", "2010-07-16").await?;
    let inception_id = inception["id"].as_str().unwrap().to_string();
    let nope = create_movie(&app, "Nope", "2022-07-22").await?;
    let nope_id = nope["id"].as_str().unwrap().to_string();
    add_comment(&app, &inception_id, 5).await?;
    add_comment(&app, &inception_id, 3).await?;

    let avg = c.get(format!("{}/api/v1/movie/{}/avg-rating", app.base_url, inception_id)).send().await?.json::<Value>().await?;
    assert_eq!(avg["avg_rating"], 4.0);
    let avg = c.get(format!("{}/api/v1/movie/{}/avg-rating", app.base_url, nope_id)).send().await?.json::<Value>().await?;
    assert_eq!(avg["avg_rating"], 0.0);

    let ratings = c.get(format!("{}/api/v1/movie/ratings", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(ratings.len(), 2);
    let grade_of = |id: &str| ratings.iter().find(|r| r["movie_id"] == id).unwrap()["grade"].clone();
    assert_eq!(grade_of(&inception_id), "Good");
    assert_eq!(grade_of(&nope_id), "No Rating");

    let counts = c.get(format!("{}/api/v1/movie/comment-counts", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    let count_of = |id: &str| counts.iter().find(|r| r["movie_id"] == id).unwrap()["total_comments"].clone();
    assert_eq!(count_of(&inception_id), 2);
    assert_eq!(count_of(&nope_id), 0);

    let hits = c.get(format!("{}/api/v1/movie/search/dynamic?q=INCEP&min_rating=4&order=asc", app.base_url))
        .send().await?.json::<Vec<Value>>().await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["movie_title"], "Inception");

    let sorted = c.get(format!("{}/api/v1/movie/sorted?order=DESC", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(sorted[0]["movie_title"], "Nope");

    let released = c.get(format!("{}/api/v1/movie/release-date?start_date=2015-01-01", app.base_url))
        .send().await?.json::<Vec<Value>>().await?;
    assert_eq!(released.len(), 1);
    assert_eq!(released[0]["release_date"], "2022-07-22");

    let by_title = c.get(format!("{}/api/v1/movie/search?title=cep", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(by_title.len(), 1);

    let all = c.get(format!("{}/api/v1/movie", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    let with_comments = all.iter().find(|m| m["id"] == inception_id.as_str()).unwrap();
    assert_eq!(with_comments["comments"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn e2e_deleting_movie_with_comments_fails_until_comments_are_gone() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let c = client();

    let movie = create_movie(&app, "Arrival", "2016-11-11").await?;
    let movie_id = movie["id"].as_str().unwrap().to_string();
    let comment = add_comment(&app, &movie_id, 5).await?.json::<Value>().await?;

    let res = c.delete(format!("{}/api/v1/movie/{}", app.base_url, movie_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Internal Server Error");

    let res = c.get(format!("{}/api/v1/movie/{}", app.base_url, movie_id)).send().await?;
    assert_eq!(res.json::<Value>().await?["comments"].as_array().unwrap().len(), 1);

    c.delete(format!("{}/api/v1/comment/{}", app.base_url, comment["id"].as_str().unwrap())).send().await?;
    let res = c.delete(format!("{}/api/v1/movie/{}", app.base_url, movie_id)).send().await?;
    assert_eq!(res.json::<Value>().await?["affected"], 1);
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_input_gets_json_error_body() -> anyhow::Result<()> {
    let app = start_server("qa").await?;
    let c = client();

    let urls = [
        format!("{}/api/v1/movie/search/dynamic?q=x&min_rating=abc", app.base_url),
        format!("{}/api/v1/movie/release-date?start_date=2020-13-01", app.base_url),
        format!("{}/api/v1/movie/not-a-uuid", app.base_url),
    ];
    for url in urls {
        let res = c.get(&url).send().await?;
        assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST, "{url}");
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"], "Bad Request");
        assert!(body["message"].is_string());
    }

    let res = c.post(format!("{}/api/v1/movie", app.base_url))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send().await?;
    assert!(res.status().is_client_error());
    assert!(res.json::<Value>().await?["message"].is_string());

    let res = c.post(format!("{}/api/v1/movie", app.base_url))
        .json(&json!({"title": "Tenet"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json::<Value>().await?["error"], "Unprocessable Entity");
    Ok(())
}

#[tokio::test]
async fn e2e_seed_fixture_is_loaded_into_fresh_store() -> anyhow::Result<()> {
    let cfg = DatabaseConfig {
        auto_create_schema: true,
        seed_on_start: true,
        seed_path: Some(concat!(env!("CARGO_MANIFEST_DIR"), "/../../seeds/movies.json").into()),
        ..memory_config()
    };
    let db = connect_with_config(&cfg).await?;
    server::prepare_store(&db, &cfg).await?;
    // second run over the same store leaves it unchanged
    server::prepare_store(&db, &cfg).await?;
    let app = serve(db, "dev").await?;

    let all = client().get(format!("{}/api/v1/movie", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(all.len(), 3);

    let ratings = client().get(format!("{}/api/v1/movie/ratings", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    let inception = ratings.iter().find(|r| r["movie_title"] == "Inception").unwrap();
    assert_eq!(inception["movie_rating"], 4.5);
    assert_eq!(inception["grade"], "Great");
    Ok(())
}
