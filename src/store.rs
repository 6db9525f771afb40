use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::models::{Movie, MoviePatch, NewMovie};

/// The seed catalog bundled into the binary; read once at startup.
const SEED_MOVIES: &str = include_str!("../data/movies.json");

/// In-memory movie collection.
///
/// Owns the data behind a single lock so each request's read-modify-write is
/// atomic relative to other requests. Insertion order is preserved; records
/// are appended on create, updated in place, and never deleted.
#[derive(Debug, Clone)]
pub struct MovieStore {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl MovieStore {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies: Arc::new(RwLock::new(movies)),
        }
    }

    /// Build a store from the bundled seed catalog.
    pub fn from_seed() -> Result<Self, serde_json::Error> {
        let movies: Vec<Movie> = serde_json::from_str(SEED_MOVIES)?;
        Ok(Self::new(movies))
    }

    /// Every movie, in insertion order.
    pub fn list(&self) -> Vec<Movie> {
        self.movies.read().unwrap().clone()
    }

    /// The subsequence of movies carrying a case-insensitive match for
    /// `genre`, in insertion order.
    pub fn list_by_genre(&self, genre: &str) -> Vec<Movie> {
        self.movies
            .read()
            .unwrap()
            .iter()
            .filter(|movie| movie.has_genre(genre))
            .cloned()
            .collect()
    }

    /// First movie whose id matches exactly.
    pub fn find(&self, id: &Uuid) -> Option<Movie> {
        self.movies
            .read()
            .unwrap()
            .iter()
            .find(|movie| movie.id == *id)
            .cloned()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.movies
            .read()
            .unwrap()
            .iter()
            .any(|movie| movie.id == *id)
    }

    /// Assign a fresh random id and append the record to the end of the
    /// collection. Collisions are treated as practically impossible and not
    /// checked for.
    pub fn insert(&self, fields: NewMovie) -> Movie {
        let movie = Movie::new(Uuid::new_v4(), fields);
        self.movies.write().unwrap().push(movie.clone());
        movie
    }

    /// Merge `patch` onto the record with the given id, returning the merged
    /// record, or `None` when no record matches.
    pub fn update(&self, id: &Uuid, patch: MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.write().unwrap();
        let movie = movies.iter_mut().find(|movie| movie.id == *id)?;
        movie.apply(patch);
        Some(movie.clone())
    }

    pub fn len(&self) -> usize {
        self.movies.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.read().unwrap().is_empty()
    }
}
