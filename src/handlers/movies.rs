use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_METHODS, ORIGIN},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::middleware_helpers::cors::ALLOW_METHODS;
use crate::models::{Movie, MoviePatch, NewMovie};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListMoviesParams {
    genre: Option<String>,
}

/// `GET /movies[?genre=]` - the full catalog, or the subsequence matching
/// the genre filter case-insensitively. Always succeeds.
async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> Json<Vec<Movie>> {
    let movies = match params.genre.as_deref() {
        Some(genre) if !genre.is_empty() => state.store.list_by_genre(genre),
        _ => state.store.list(),
    };
    Json(movies)
}

/// `GET /movies/:id` - exact id match. A path segment that is not a
/// well-formed UUID cannot match any stored id, so it falls out as the same
/// not-found response.
async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::MovieNotFound)?;
    state
        .store
        .find(&id)
        .map(Json)
        .ok_or(ApiError::MovieNotFound)
}

/// `POST /movies` - validate the full schema, then append a record under a
/// fresh random id.
async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let fields = NewMovie::from_json(&body)?;
    let movie = state.store.insert(fields);
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `PATCH /movies/:id` - merge the supplied fields onto the stored record.
/// An unknown id is a not-found regardless of body validity.
async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::MovieNotFound)?;
    if !state.store.contains(&id) {
        return Err(ApiError::MovieNotFound);
    }

    let Json(body) = body?;
    let patch = MoviePatch::from_json(&body)?;
    state
        .store
        .update(&id, patch)
        .map(Json)
        .ok_or(ApiError::MovieNotFound)
}

/// `OPTIONS /movies/:id` - CORS pre-flight. Allow-listed origins are told
/// which methods the resource supports; the allow-origin echo itself is
/// added by the shared middleware.
async fn preflight_movie(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();

    if let Some(origin) = headers.get(ORIGIN) {
        if state.allowed_origins.contains(origin) {
            response.headers_mut().insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
        }
    }

    response
}

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route(
            "/:id",
            get(get_movie).patch(update_movie).options(preflight_movie),
        )
}
