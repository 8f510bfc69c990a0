use crate::config::DataConfig;
use crate::error::{RecError, RecResult};
use crate::models::{Movie, Rating};
use crate::utils::validation::{validate_movie, validate_rating};
use std::path::Path;
use tracing::{info, warn};

/// The two tabular inputs, parsed and validated but otherwise untouched.
pub struct Dataset {
    pub movies: Vec<Movie>,
    pub ratings: Vec<Rating>,
}

impl Dataset {
    pub fn load(config: &DataConfig) -> RecResult<Self> {
        let movies = load_movies(&config.movies_path)?;
        let ratings = load_ratings(&config.ratings_path)?;
        Ok(Self { movies, ratings })
    }
}

/// Reads the movie catalog. Required header columns: movieId, title; genres
/// is optional and defaults to empty. Row order is preserved, it defines
/// which movie an ambiguous title query resolves to.
pub fn load_movies(path: impl AsRef<Path>) -> RecResult<Vec<Movie>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| RecError::Load(format!("{}: {}", path.display(), e)))?;

    let mut movies = Vec::new();
    for record in reader.deserialize() {
        let movie: Movie = record?;
        validate_movie(&movie)?;
        movies.push(movie);
    }

    if movies.is_empty() {
        warn!(path = %path.display(), "movie catalog is empty");
    }
    info!(movies = movies.len(), path = %path.display(), "loaded movie catalog");
    Ok(movies)
}

/// Reads the rating set. Required header columns: userId, movieId, rating;
/// a trailing timestamp column is accepted and ignored. Every rating must
/// be finite and within the 0.5..5.0 scale.
pub fn load_ratings(path: impl AsRef<Path>) -> RecResult<Vec<Rating>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| RecError::Load(format!("{}: {}", path.display(), e)))?;

    let mut ratings = Vec::new();
    for record in reader.deserialize() {
        let rating: Rating = record?;
        validate_rating(&rating)?;
        ratings.push(rating);
    }

    info!(ratings = ratings.len(), path = %path.display(), "loaded ratings");
    Ok(ratings)
}
