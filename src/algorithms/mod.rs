use crate::error::{RecError, RecResult};
use crate::models::{MovieId, Rating, UserId};
use crate::utils::{dot, normalize_vector, top_k_indices};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// Dense user-by-item rating matrix. Rows are the distinct user IDs and
/// columns the distinct movie IDs present in the ratings, both sorted
/// ascending; cells hold the rating, or 0 where no rating exists.
pub struct UserItemMatrix {
    pub matrix: Array2<f32>,
    pub user_ids: Vec<UserId>,
    pub item_ids: Vec<MovieId>,
    pub item_index: HashMap<MovieId, usize>,
}

impl UserItemMatrix {
    /// Pivots the rating set into the dense matrix. Duplicate (user, movie)
    /// pairs resolve to the last occurrence.
    pub fn from_ratings(ratings: &[Rating]) -> RecResult<Self> {
        if ratings.is_empty() {
            return Err(RecError::Build(
                "rating set is empty, nothing to pivot".to_string(),
            ));
        }

        let mut user_ids: Vec<UserId> = ratings.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut item_ids: Vec<MovieId> = ratings.iter().map(|r| r.movie_id).collect();
        item_ids.sort_unstable();
        item_ids.dedup();

        let user_index: HashMap<UserId, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();
        let item_index: HashMap<MovieId, usize> = item_ids
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        let mut matrix = Array2::<f32>::zeros((user_ids.len(), item_ids.len()));
        for rating in ratings {
            let row = user_index[&rating.user_id];
            let col = item_index[&rating.movie_id];
            matrix[[row, col]] = rating.rating;
        }

        info!(
            users = user_ids.len(),
            items = item_ids.len(),
            ratings = ratings.len(),
            "built user-item matrix"
        );

        Ok(Self {
            matrix,
            user_ids,
            item_ids,
            item_index,
        })
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_ids.len()
    }
}

/// Square symmetric item-item cosine similarity matrix, indexed the same way
/// as the user-item matrix columns. Built once at startup and never mutated,
/// so it can be shared across request handlers without locking.
#[derive(Debug)]
pub struct ItemSimilarity {
    similarity: Array2<f32>,
    item_ids: Vec<MovieId>,
    item_index: HashMap<MovieId, usize>,
}

impl ItemSimilarity {
    /// Computes pairwise cosine similarity between all item columns.
    ///
    /// Item vectors are normalized up front so each pair costs one dot
    /// product; a zero vector (an item with no nonzero ratings) stays zero
    /// and is similar to nothing, including itself. The diagonal is pinned
    /// to exactly 1.0 for rated items.
    pub fn build(user_item: &UserItemMatrix) -> RecResult<Self> {
        let n_items = user_item.num_items();
        let n_users = user_item.num_users();

        // Materialize a standard-layout item-major copy; a plain transpose
        // view keeps the original strides, so assign into a fresh array to
        // make each item vector one contiguous row.
        let mut item_vectors = Array2::<f32>::zeros((n_items, n_users));
        item_vectors.assign(&user_item.matrix.t());
        let mut data = item_vectors.into_raw_vec();

        // n_users >= 1 here since the rating set is non-empty.
        let mut rated = vec![false; n_items];
        for (i, row) in data.chunks_mut(n_users).enumerate() {
            rated[i] = row.iter().any(|&v| v != 0.0);
            normalize_vector(row);
        }

        let rows: Vec<&[f32]> = data.chunks(n_users).collect();

        let mut sim_data = vec![0.0f32; n_items * n_items];
        sim_data
            .par_chunks_mut(n_items)
            .enumerate()
            .for_each(|(i, out)| {
                for (j, out_ij) in out.iter_mut().enumerate() {
                    *out_ij = if i == j {
                        if rated[i] {
                            1.0
                        } else {
                            0.0
                        }
                    } else {
                        dot(rows[i], rows[j])
                    };
                }
            });

        let similarity = Array2::from_shape_vec((n_items, n_items), sim_data)
            .map_err(|e| RecError::Build(e.to_string()))?;

        info!(items = n_items, users = n_users, "built item similarity matrix");

        Ok(Self {
            similarity,
            item_ids: user_item.item_ids.clone(),
            item_index: user_item.item_index.clone(),
        })
    }

    pub fn num_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn item_ids(&self) -> &[MovieId] {
        &self.item_ids
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.item_index.contains_key(&movie_id)
    }

    /// The similarity row for one movie, in item-ID column order.
    pub fn scores_for(&self, movie_id: MovieId) -> Option<ArrayView1<'_, f32>> {
        self.item_index
            .get(&movie_id)
            .map(|&pos| self.similarity.row(pos))
    }

    pub fn score(&self, a: MovieId, b: MovieId) -> Option<f32> {
        let j = *self.item_index.get(&b)?;
        self.scores_for(a).map(|row| row[j])
    }

    /// The n movies most similar to the given one, excluding the movie
    /// itself, sorted by similarity descending with ties broken by movie ID
    /// ascending. Returns all other movies when fewer than n exist, and an
    /// empty list for a movie absent from the ratings.
    pub fn top_n(&self, movie_id: MovieId, n: usize) -> Vec<(MovieId, f32)> {
        let pos = match self.item_index.get(&movie_id) {
            Some(&pos) => pos,
            None => return Vec::new(),
        };

        let mut scores = self.similarity.row(pos).to_vec();
        // Rank the movie last so it can never land in the result.
        scores[pos] = f32::NEG_INFINITY;

        // Columns are in ascending item-ID order, and top_k_indices keeps
        // ascending index order on ties, which gives the ID tie-break.
        top_k_indices(&scores, n.saturating_add(1))
            .into_iter()
            .filter(|&i| i != pos)
            .take(n)
            .map(|i| (self.item_ids[i], scores[i]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ratings() -> Vec<Rating> {
        // Items 1 and 2 share identical rating vectors; item 3 is rated by
        // a disjoint user set, so its vector is orthogonal to both.
        vec![
            Rating::new(1, 1, 4.0),
            Rating::new(1, 2, 4.0),
            Rating::new(2, 1, 2.0),
            Rating::new(2, 2, 2.0),
            Rating::new(3, 3, 5.0),
        ]
    }

    #[test]
    fn test_pivot_shape_and_ordering() {
        let matrix = UserItemMatrix::from_ratings(&sample_ratings()).unwrap();
        assert_eq!(matrix.user_ids, vec![1, 2, 3]);
        assert_eq!(matrix.item_ids, vec![1, 2, 3]);
        assert_eq!(matrix.matrix.shape(), &[3, 3]);
        assert_eq!(matrix.matrix[[0, 0]], 4.0);
        assert_eq!(matrix.matrix[[2, 2]], 5.0);
        // Absent pair is zero-filled.
        assert_eq!(matrix.matrix[[0, 2]], 0.0);
    }

    #[test]
    fn test_pivot_rejects_empty_ratings() {
        assert!(matches!(
            UserItemMatrix::from_ratings(&[]),
            Err(RecError::Build(_))
        ));
    }

    #[test]
    fn test_pivot_duplicate_last_wins() {
        let ratings = vec![Rating::new(1, 1, 2.0), Rating::new(1, 1, 5.0)];
        let matrix = UserItemMatrix::from_ratings(&ratings).unwrap();
        assert_eq!(matrix.matrix[[0, 0]], 5.0);
    }

    #[test]
    fn test_similarity_diagonal_and_symmetry() {
        let matrix = UserItemMatrix::from_ratings(&sample_ratings()).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        for &id in sim.item_ids() {
            assert_eq!(sim.score(id, id), Some(1.0));
        }
        for &a in sim.item_ids() {
            for &b in sim.item_ids() {
                assert_eq!(sim.score(a, b), sim.score(b, a));
            }
        }
    }

    #[test]
    fn test_build_succeeds_on_dense_multi_user_matrix() {
        // Every cell rated, two users by two movies. The item vectors come
        // from a transposed copy of the pivot, so this shape catches any
        // layout assumption about the transpose.
        let ratings = vec![
            Rating::new(1, 1, 4.0),
            Rating::new(1, 2, 2.0),
            Rating::new(2, 1, 1.0),
            Rating::new(2, 2, 5.0),
        ];
        let matrix = UserItemMatrix::from_ratings(&ratings).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        assert_eq!(sim.score(1, 1), Some(1.0));
        assert_eq!(sim.score(2, 2), Some(1.0));
        // Columns (4,1) and (2,5): cos = 13 / (sqrt(17) * sqrt(29)).
        let expected = 13.0 / (17.0f32.sqrt() * 29.0f32.sqrt());
        assert!((sim.score(1, 2).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_values() {
        let matrix = UserItemMatrix::from_ratings(&sample_ratings()).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        assert!((sim.score(1, 2).unwrap() - 1.0).abs() < 1e-6);
        assert!(sim.score(1, 3).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_item_is_similar_to_nothing() {
        // Movie 2's only cell is 0, so its column has zero norm. The
        // convention keeps every similarity at 0 instead of dividing by it.
        let ratings = vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 0.0),
            Rating::new(2, 3, 3.0),
        ];
        let matrix = UserItemMatrix::from_ratings(&ratings).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        assert_eq!(sim.score(2, 1), Some(0.0));
        assert_eq!(sim.score(2, 3), Some(0.0));
        assert_eq!(sim.score(2, 2), Some(0.0));
    }

    #[test]
    fn test_top_n_excludes_self_and_orders() {
        let matrix = UserItemMatrix::from_ratings(&sample_ratings()).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        let ranked = sim.top_n(1, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 2);
        assert!((ranked[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(ranked[1].0, 3);

        let top_1 = sim.top_n(1, 1);
        assert_eq!(top_1.len(), 1);
        assert_eq!(top_1[0].0, 2);
    }

    #[test]
    fn test_top_n_tie_break_by_id() {
        // Movies 2 and 3 have identical vectors, so both tie at similarity 1
        // with movie 1 rated identically; lower ID must come first.
        let ratings = vec![
            Rating::new(1, 1, 3.0),
            Rating::new(1, 2, 3.0),
            Rating::new(1, 3, 3.0),
        ];
        let matrix = UserItemMatrix::from_ratings(&ratings).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();

        let ranked = sim.top_n(1, 10);
        assert_eq!(
            ranked.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_top_n_unknown_movie_is_empty() {
        let matrix = UserItemMatrix::from_ratings(&sample_ratings()).unwrap();
        let sim = ItemSimilarity::build(&matrix).unwrap();
        assert!(sim.top_n(99, 10).is_empty());
    }
}
