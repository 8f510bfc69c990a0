use serde::{Deserialize, Serialize};

pub type UserId = u32;
pub type MovieId = u32;

/// A catalog entry from movies.csv. Immutable after load; catalog order is
/// the file order, which is what "first match wins" is defined against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    // movies.csv names this column movieId; responses serialize it as id.
    #[serde(alias = "movieId")]
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: String,
}

/// A single (user, movie, score) observation from ratings.csv.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(alias = "userId")]
    pub user_id: UserId,
    #[serde(alias = "movieId")]
    pub movie_id: MovieId,
    pub rating: f32,
    // MovieLens exports carry a timestamp column; accepted and ignored.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendQuery {
    pub movie_name: String,
    pub n: Option<usize>,
}

/// One ranked entry in a recommendation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub id: MovieId,
    pub title: String,
    pub genres: String,
    pub score: f32,
}

/// The result of a successful title query: the movie the free-text query
/// resolved to, plus up to n similar movies ranked by similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub matched_movie: Movie,
    pub recommendations: Vec<RecommendedMovie>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genres: String::new(),
        }
    }

    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = genres.into();
        self
    }
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: None,
        }
    }
}
