use polars::prelude::*;
use rustc_hash::FxHashMap as HashMap;

use crate::data::MovieLensData;
use crate::popularity::{self, MovieStats};

/// Top `k` movies with at least `min_ratings` ratings, joined with their
/// titles. Ranked ids missing from the movie table are dropped.
pub fn top_rated_titles(
    db: &MovieLensData,
    stats: &MovieStats,
    min_ratings: u32,
    k: usize,
) -> PolarsResult<DataFrame> {
    let (retained, _) = popularity::split_by_min_ratings(&stats.counts, min_ratings);
    let ranked = popularity::rank_by_mean(stats, &retained, k);

    let titles: HashMap<i64, &str> = db
        .movie
        .column("movie id")?
        .i64()?
        .into_iter()
        .zip(db.movie.column("movie title")?.str()?)
        .filter_map(|(movie_id, title)| {
            if let (Some(movie_id), Some(title)) = (movie_id, title) {
                Some((movie_id, title))
            } else {
                None
            }
        })
        .collect();

    let mut ids = Vec::with_capacity(ranked.len());
    let mut names = Vec::with_capacity(ranked.len());
    let mut means = Vec::with_capacity(ranked.len());
    let mut counts = Vec::with_capacity(ranked.len());
    for (movie_id, mean, count) in ranked {
        if let Some(title) = titles.get(&movie_id) {
            ids.push(movie_id);
            names.push(*title);
            means.push(mean);
            counts.push(i64::from(count));
        }
    }

    df!(
        "movie id" => ids,
        "movie title" => names,
        "mean rating" => means,
        "num ratings" => counts,
    )
}

pub fn report(db: &MovieLensData, stats: &MovieStats) -> PolarsResult<DataFrame> {
    println!("\n== Popularity bias ==");
    let (retained, removed) =
        popularity::split_by_min_ratings(&stats.counts, popularity::MIN_RATINGS);
    println!(
        "Movies with at least {} ratings: {} (dropping {} sparsely rated)",
        popularity::MIN_RATINGS,
        retained.len(),
        removed.len()
    );

    let top = top_rated_titles(db, stats, popularity::MIN_RATINGS, popularity::TOP_K)?;
    println!(
        "Top {} movies with at least {} ratings:\n{}",
        popularity::TOP_K,
        popularity::MIN_RATINGS,
        top
    );
    Ok(top)
}

#[cfg(test)]
mod test_top_movies {
    use std::path::Path;

    use super::*;
    use crate::popularity::movie_stats;

    #[test]
    fn test_fixture_top_titles() -> Result<(), PolarsError> {
        let db = MovieLensData::load_from_dir(Path::new("fixtures"))?;
        let stats = movie_stats(&db.ratings)?;
        let top = top_rated_titles(&db, &stats, 50, 10)?;

        let ids: Vec<i64> = top.column("movie id")?.i64()?.into_no_null_iter().collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);

        let titles: Vec<&str> = top
            .column("movie title")?
            .str()?
            .into_no_null_iter()
            .collect();
        assert_eq!(
            titles,
            vec![
                "Casablanca (1942)",
                "Citizen Kane (1941)",
                "12 Angry Men (1957)",
                "The Third Man (1949)",
            ]
        );

        let means: Vec<f64> = top
            .column("mean rating")?
            .f64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(means, vec![4.5, 4.5, 4.4, 3.0]);

        let counts: Vec<i64> = top
            .column("num ratings")?
            .i64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(counts, vec![60, 52, 55, 50]);
        Ok(())
    }

    #[test]
    fn test_threshold_two_with_titles() -> Result<(), PolarsError> {
        // ratings [5,5,4] clear a threshold of 2 with mean 4.67; a lone
        // 1-star movie is excluded outright
        let db = MovieLensData {
            movie: df!(
                "movie id" => [9i64, 11],
                "movie title" => ["Paths of Glory (1957)", "Glen or Glenda (1953)"],
            )?,
            ratings: df!(
                "user id" => [1i64, 2, 3, 4],
                "movie id" => [9i64, 9, 9, 11],
                "rating" => [5i64, 5, 4, 1],
            )?,
            user: df!(
                "user id" => [1i64, 2, 3, 4],
                "age" => [20i64, 30, 40, 50],
                "gender" => ["M", "F", "M", "F"],
                "occupation" => ["student", "writer", "student", "writer"],
            )?,
        };
        let stats = movie_stats(&db.ratings)?;
        let top = top_rated_titles(&db, &stats, 2, 10)?;

        assert_eq!(top.height(), 1);
        let ids: Vec<i64> = top.column("movie id")?.i64()?.into_no_null_iter().collect();
        assert_eq!(ids, vec![9]);
        let titles: Vec<&str> = top
            .column("movie title")?
            .str()?
            .into_no_null_iter()
            .collect();
        assert_eq!(titles, vec!["Paths of Glory (1957)"]);
        let means: Vec<f64> = top
            .column("mean rating")?
            .f64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(means, vec![14.0 / 3.0]);
        let counts: Vec<i64> = top
            .column("num ratings")?
            .i64()?
            .into_no_null_iter()
            .collect();
        assert_eq!(counts, vec![3]);
        Ok(())
    }

    #[test]
    fn test_ranked_id_without_movie_row_is_dropped() -> Result<(), PolarsError> {
        let db = MovieLensData {
            movie: df!(
                "movie id" => [1i64],
                "movie title" => ["Only Movie (1999)"],
            )?,
            ratings: df!(
                "user id" => [1i64, 2, 3],
                "movie id" => [1i64, 2, 2],
                "rating" => [4i64, 5, 5],
            )?,
            user: df!(
                "user id" => [1i64, 2, 3],
                "age" => [30i64, 40, 50],
                "gender" => ["M", "F", "M"],
                "occupation" => ["student", "student", "writer"],
            )?,
        };
        let stats = movie_stats(&db.ratings)?;
        let top = top_rated_titles(&db, &stats, 1, 10)?;

        // movie 2 ranks first on mean but has no title row
        assert_eq!(top.height(), 1);
        let ids: Vec<i64> = top.column("movie id")?.i64()?.into_no_null_iter().collect();
        assert_eq!(ids, vec![1]);
        Ok(())
    }
}
