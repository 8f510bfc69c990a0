use crate::algorithms::{ItemSimilarity, UserItemMatrix};
use crate::error::{RecError, RecResult};
use crate::models::{Movie, MovieId, Rating, RecommendedMovie, Recommendations};
use std::collections::HashMap;
use tracing::{info, warn};

/// Title lookup and ranking over the precomputed similarity matrix.
///
/// Everything here is built once at startup and read-only afterwards;
/// handlers share it through an Arc without locking.
#[derive(Debug)]
pub struct RecommenderService {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
    similarity: ItemSimilarity,
    default_top_n: usize,
}

impl RecommenderService {
    pub fn new(movies: Vec<Movie>, ratings: &[Rating], default_top_n: usize) -> RecResult<Self> {
        let user_item = UserItemMatrix::from_ratings(ratings)?;
        let similarity = ItemSimilarity::build(&user_item)?;

        let by_id: HashMap<MovieId, usize> = movies
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();

        info!(
            movies = movies.len(),
            rated_movies = similarity.num_items(),
            "recommender service ready"
        );

        Ok(Self {
            movies,
            by_id,
            similarity,
            default_top_n,
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn similarity(&self) -> &ItemSimilarity {
        &self.similarity
    }

    /// Resolves a free-text title query to a movie and returns up to n most
    /// similar movies, ranked by similarity descending.
    ///
    /// Matching is a case-insensitive substring search; when several titles
    /// match, the first one in catalog order wins. Ties in similarity are
    /// broken by movie ID ascending so identical queries always produce
    /// identical output.
    pub fn find_similar(&self, title_query: &str, n: Option<usize>) -> RecResult<Recommendations> {
        let n = n.unwrap_or(self.default_top_n);
        let needle = title_query.to_lowercase();

        let matched = self
            .movies
            .iter()
            .find(|movie| movie.title.to_lowercase().contains(&needle))
            .ok_or_else(|| RecError::NotFound(format!("Movie '{}' not found.", title_query)))?;

        if !self.similarity.contains(matched.id) {
            // A catalog movie nobody has rated has no similarity column;
            // degrade to an empty list rather than failing the request.
            warn!(movie_id = matched.id, "matched movie has no ratings");
        }

        // Rank everything first: a rating row can reference a movie with no
        // catalog entry, and skipping those must not shrink the result
        // below n while catalog-backed candidates remain.
        let recommendations = self
            .similarity
            .top_n(matched.id, self.similarity.num_items())
            .into_iter()
            .filter_map(|(id, score)| {
                self.by_id.get(&id).map(|&pos| {
                    let movie = &self.movies[pos];
                    RecommendedMovie {
                        id: movie.id,
                        title: movie.title.clone(),
                        genres: movie.genres.clone(),
                        score,
                    }
                })
            })
            .take(n)
            .collect();

        Ok(Recommendations {
            matched_movie: matched.clone(),
            recommendations,
        })
    }
}
