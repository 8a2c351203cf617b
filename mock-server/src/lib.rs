use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Director {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Bio")]
    pub bio: String,
    #[serde(rename = "Birth")]
    pub birth: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Genre")]
    pub genre: Genre,
    #[serde(rename = "Director")]
    pub director: Director,
    #[serde(rename = "ImagePath")]
    pub image_path: String,
    #[serde(rename = "Featured")]
    pub featured: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "FavoriteMovies")]
    pub favorite_movies: Vec<String>,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthday", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

#[derive(Deserialize)]
pub struct Registration {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthday")]
    pub birthday: Option<String>,
}

#[derive(Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "Username")]
    pub username: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Birthday")]
    pub birthday: Option<String>,
}

#[derive(Deserialize)]
pub struct Login {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog {
        movies: seed_movies(),
        ..Catalog::default()
    }));
    Router::new()
        .route("/login", post(login))
        .route("/movies", get(list_movies))
        .route("/movies/{title}", get(get_movie))
        .route("/genres/{name}", get(get_genre))
        .route("/directors/{name}", get(get_director))
        .route("/users", post(register))
        .route(
            "/users/{username}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{username}/movies", get(list_favorites))
        .route(
            "/users/{username}/movies/{movie_id}",
            post(add_favorite).delete(remove_favorite),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub fn seed_movies() -> Vec<Movie> {
    let scott = Director {
        name: "Ridley Scott".to_string(),
        bio: "English film director and producer.".to_string(),
        birth: "1937".to_string(),
    };
    let sci_fi = Genre {
        name: "Science Fiction".to_string(),
        description: "Speculative stories built on imagined science.".to_string(),
    };
    vec![
        Movie {
            id: "60f1a0000000000000000001".to_string(),
            title: "Alien".to_string(),
            description: "A salvage crew picks up something it should not have.".to_string(),
            genre: sci_fi.clone(),
            director: scott.clone(),
            image_path: "alien.png".to_string(),
            featured: true,
        },
        Movie {
            id: "60f1a0000000000000000002".to_string(),
            title: "Blade Runner".to_string(),
            description: "A blade runner hunts four escaped replicants.".to_string(),
            genre: sci_fi,
            director: scott,
            image_path: "blade-runner.png".to_string(),
            featured: false,
        },
        Movie {
            id: "60f1a0000000000000000003".to_string(),
            title: "Heat".to_string(),
            description: "A detective and a career thief circle each other in Los Angeles."
                .to_string(),
            genre: Genre {
                name: "Crime".to_string(),
                description: "Stories about those who break the law and those who chase them."
                    .to_string(),
            },
            director: Director {
                name: "Michael Mann".to_string(),
                bio: "American director, screenwriter and producer.".to_string(),
                birth: "1943".to_string(),
            },
            image_path: "heat.png".to_string(),
            featured: false,
        },
    ]
}

/// Resolve the bearer token in `headers` to a username.
fn authorize(catalog: &Catalog, headers: &HeaderMap) -> Result<String, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    catalog
        .tokens
        .get(token)
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Registration>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    let mut catalog = db.write().await;
    if catalog.accounts.contains_key(&input.username) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} already exists", input.username),
        ));
    }
    let user = User {
        id: Uuid::new_v4().simple().to_string(),
        favorite_movies: Vec::new(),
        username: input.username,
        email: input.email,
        birthday: input.birthday,
    };
    tracing::info!(username = %user.username, "registered user");
    catalog.accounts.insert(
        user.username.clone(),
        Account {
            user: user.clone(),
            password: input.password,
        },
    );
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Login>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let mut catalog = db.write().await;
    let user = catalog
        .accounts
        .get(&input.username)
        .filter(|account| account.password == input.password)
        .map(|account| account.user.clone())
        .ok_or((StatusCode::BAD_REQUEST, "Something is not right".to_string()))?;
    let token = Uuid::new_v4().to_string();
    catalog.tokens.insert(token.clone(), user.username.clone());
    Ok(Json(LoginResponse { user, token }))
}

async fn list_movies(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Movie>>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    Ok(Json(catalog.movies.clone()))
}

async fn get_movie(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(title): Path<String>,
) -> Result<Json<Movie>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    catalog
        .movies
        .iter()
        .find(|movie| movie.title == title)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_genre(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<Genre>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    catalog
        .movies
        .iter()
        .map(|movie| &movie.genre)
        .find(|genre| genre.name == name)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_director(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<Director>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    catalog
        .movies
        .iter()
        .map(|movie| &movie.director)
        .find(|director| director.name == name)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    catalog
        .accounts
        .get(&username)
        .map(|account| Json(account.user.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(input): Json<UserUpdate>,
) -> Result<Json<User>, StatusCode> {
    let mut catalog = db.write().await;
    authorize(&catalog, &headers)?;
    if !catalog.accounts.contains_key(&username) {
        return Err(StatusCode::NOT_FOUND);
    }
    if let Some(new_name) = &input.username {
        if *new_name != username && catalog.accounts.contains_key(new_name) {
            return Err(StatusCode::BAD_REQUEST);
        }
    }
    let mut account = catalog
        .accounts
        .remove(&username)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(new_name) = input.username {
        account.user.username = new_name;
    }
    if let Some(password) = input.password {
        account.password = password;
    }
    if let Some(email) = input.email {
        account.user.email = email;
    }
    if input.birthday.is_some() {
        account.user.birthday = input.birthday;
    }
    let user = account.user.clone();
    if user.username != username {
        for owner in catalog.tokens.values_mut().filter(|owner| **owner == username) {
            *owner = user.username.clone();
        }
    }
    catalog.accounts.insert(user.username.clone(), account);
    Ok(Json(user))
}

async fn list_favorites(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>, StatusCode> {
    let catalog = db.read().await;
    authorize(&catalog, &headers)?;
    catalog
        .accounts
        .get(&username)
        .map(|account| Json(account.user.favorite_movies.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn add_favorite(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<Json<User>, StatusCode> {
    let mut catalog = db.write().await;
    authorize(&catalog, &headers)?;
    if !catalog.movies.iter().any(|movie| movie.id == movie_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let account = catalog
        .accounts
        .get_mut(&username)
        .ok_or(StatusCode::NOT_FOUND)?;
    if !account.user.favorite_movies.contains(&movie_id) {
        account.user.favorite_movies.push(movie_id);
    }
    Ok(Json(account.user.clone()))
}

async fn remove_favorite(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<Json<User>, StatusCode> {
    let mut catalog = db.write().await;
    authorize(&catalog, &headers)?;
    let account = catalog
        .accounts
        .get_mut(&username)
        .ok_or(StatusCode::NOT_FOUND)?;
    account.user.favorite_movies.retain(|id| *id != movie_id);
    Ok(Json(account.user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<String, (StatusCode, String)> {
    let mut catalog = db.write().await;
    authorize(&catalog, &headers).map_err(|status| (status, String::new()))?;
    if catalog.accounts.remove(&username).is_none() {
        return Err((StatusCode::NOT_FOUND, format!("{username} was not found")));
    }
    catalog.tokens.retain(|_, owner| *owner != username);
    tracing::info!(%username, "deleted user");
    Ok(format!("{username} was deleted."))
}
