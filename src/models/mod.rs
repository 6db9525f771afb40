// Core models
pub mod movie;

pub use movie::{Genre, Movie, MoviePatch, NewMovie, DEFAULT_RATE};
