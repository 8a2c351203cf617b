use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Director, Genre, LoginResponse, Movie, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

/// Register `username` and log in, returning the bearer token.
async fn sign_up(app: &Router, username: &str) -> String {
    let body = format!(r#"{{"Username":"{username}","Password":"pw","Email":"{username}@x.com"}}"#);
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/users", None, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = format!(r#"{{"Username":"{username}","Password":"pw"}}"#);
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = body_json(resp).await;
    assert_eq!(login.user.username, username);
    login.token
}

// --- auth ---

#[tokio::test]
async fn movies_require_token() {
    let resp = app()
        .oneshot(Request::builder().uri("/movies").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let resp = app().oneshot(authed("GET", "/movies", "forged")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_returns_400() {
    let app = app();
    sign_up(&app, "bob").await;
    let resp = app
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            r#"{"Username":"bob","Password":"wrong"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- register ---

#[tokio::test]
async fn register_duplicate_returns_400() {
    let app = app();
    sign_up(&app, "bob").await;
    let resp = app
        .oneshot(json_request(
            "POST",
            "/users",
            None,
            r#"{"Username":"bob","Password":"pw","Email":"b@x.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", None, r#"{"Username":"a"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- catalog ---

#[tokio::test]
async fn catalog_lookups() {
    let app = app();
    let token = sign_up(&app, "bob").await;

    let resp = app.clone().oneshot(authed("GET", "/movies", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let movies: Vec<Movie> = body_json(resp).await;
    assert_eq!(movies.len(), 3);

    let resp = app
        .clone()
        .oneshot(authed("GET", "/movies/Blade%20Runner", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let movie: Movie = body_json(resp).await;
    assert_eq!(movie.title, "Blade Runner");

    let resp = app
        .clone()
        .oneshot(authed("GET", "/genres/Crime", &token))
        .await
        .unwrap();
    let genre: Genre = body_json(resp).await;
    assert_eq!(genre.name, "Crime");

    let resp = app
        .clone()
        .oneshot(authed("GET", "/directors/Ridley%20Scott", &token))
        .await
        .unwrap();
    let director: Director = body_json(resp).await;
    assert_eq!(director.birth, "1937");

    let resp = app
        .oneshot(authed("GET", "/movies/Nonexistent", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- edit ---

#[tokio::test]
async fn rename_onto_taken_username_returns_400() {
    let app = app();
    let token = sign_up(&app, "bob").await;
    let alice_token = sign_up(&app, "alice").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/users/bob",
            Some(&token),
            r#"{"Username":"alice"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // both accounts are untouched
    let resp = app
        .clone()
        .oneshot(authed("GET", "/users/alice", &alice_token))
        .await
        .unwrap();
    let alice: User = body_json(resp).await;
    assert_eq!(alice.email, "alice@x.com");

    let resp = app.oneshot(authed("GET", "/users/bob", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bob: User = body_json(resp).await;
    assert_eq!(bob.email, "bob@x.com");
}

// --- favorites ---

#[tokio::test]
async fn add_unknown_movie_returns_404() {
    let app = app();
    let token = sign_up(&app, "bob").await;
    let resp = app
        .oneshot(authed("POST", "/users/bob/movies/missing", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full user lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    let app = app();
    let token = sign_up(&app, "bob").await;
    let movie_id = "60f1a0000000000000000001";

    // profile
    let resp = app.clone().oneshot(authed("GET", "/users/bob", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.email, "bob@x.com");
    assert!(user.favorite_movies.is_empty());

    // add favorite twice, stored once
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(authed("POST", &format!("/users/bob/movies/{movie_id}"), &token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = app
        .clone()
        .oneshot(authed("GET", "/users/bob/movies", &token))
        .await
        .unwrap();
    let favorites: Vec<String> = body_json(resp).await;
    assert_eq!(favorites, vec![movie_id.to_string()]);

    // remove favorite
    let resp = app
        .clone()
        .oneshot(authed("DELETE", &format!("/users/bob/movies/{movie_id}"), &token))
        .await
        .unwrap();
    let user: User = body_json(resp).await;
    assert!(user.favorite_movies.is_empty());

    // edit: only email
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/users/bob",
            Some(&token),
            r#"{"Username":"bob","Email":"new@x.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.email, "new@x.com");
    assert_eq!(user.username, "bob");

    // delete
    let resp = app.clone().oneshot(authed("DELETE", "/users/bob", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "bob was deleted.");

    // token dies with the account
    let resp = app.oneshot(authed("GET", "/users/bob", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
