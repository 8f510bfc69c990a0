use crate::error::{RecError, RecResult};
use crate::models::{Movie, Rating};

pub const MIN_RATING: f32 = 0.5;
pub const MAX_RATING: f32 = 5.0;

pub fn validate_movie(movie: &Movie) -> RecResult<()> {
    if movie.title.trim().is_empty() {
        return Err(RecError::Load(format!(
            "Movie {} has an empty title",
            movie.id
        )));
    }

    Ok(())
}

pub fn validate_rating(rating: &Rating) -> RecResult<()> {
    if !rating.rating.is_finite() {
        return Err(RecError::Load(format!(
            "Rating for user {} / movie {} is not a finite number",
            rating.user_id, rating.movie_id
        )));
    }

    if rating.rating < MIN_RATING || rating.rating > MAX_RATING {
        return Err(RecError::Load(format!(
            "Rating {} for user {} / movie {} is outside {}..{}",
            rating.rating, rating.user_id, rating.movie_id, MIN_RATING, MAX_RATING
        )));
    }

    Ok(())
}
