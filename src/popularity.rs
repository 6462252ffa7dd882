use ahash::HashMap;
use polars::prelude::*;

/// Popularity cutoff: movies rated fewer times than this carry too much
/// small-sample noise to rank by average.
pub const MIN_RATINGS: u32 = 50;
pub const TOP_K: usize = 10;

pub struct MovieStats {
    pub counts: HashMap<i64, u32>,
    pub means: HashMap<i64, f64>,
}

impl MovieStats {
    pub fn movie_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.counts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

pub fn movie_stats(ratings: &DataFrame) -> PolarsResult<MovieStats> {
    let acc: HashMap<i64, (i64, u32)> = ratings
        .column("movie id")?
        .i64()?
        .into_iter()
        .zip(ratings.column("rating")?.i64()?)
        .filter_map(|(movie_id, rating)| {
            if let (Some(movie_id), Some(rating)) = (movie_id, rating) {
                Some((movie_id, rating))
            } else {
                None
            }
        })
        .fold(HashMap::default(), |mut acc, (movie_id, rating)| {
            let e = acc.entry(movie_id).or_default();
            e.0 += rating;
            e.1 += 1;
            acc
        });

    let counts = acc.iter().map(|(&id, &(_, count))| (id, count)).collect();
    let means = acc
        .iter()
        .map(|(&id, &(sum, count))| (id, sum as f64 / f64::from(count)))
        .collect();
    Ok(MovieStats { counts, means })
}

/// Ranks `ids` by mean rating descending and keeps the first `k`. Ties
/// break by rating count descending, then movie id ascending, so equal
/// means order deterministically. Ids with no ratings are skipped.
pub fn rank_by_mean(stats: &MovieStats, ids: &[i64], k: usize) -> Vec<(i64, f64, u32)> {
    let mut ranked: Vec<(i64, f64, u32)> = ids
        .iter()
        .filter_map(|id| {
            let mean = stats.means.get(id)?;
            let count = stats.counts.get(id)?;
            Some((*id, *mean, *count))
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(k);
    ranked
}

/// Partitions movie ids into (retained, removed) around `min_ratings`.
/// Both sides come back sorted by id.
pub fn split_by_min_ratings(counts: &HashMap<i64, u32>, min_ratings: u32) -> (Vec<i64>, Vec<i64>) {
    let mut retained = Vec::new();
    let mut removed = Vec::new();
    for (&movie_id, &count) in counts {
        if count >= min_ratings {
            retained.push(movie_id);
        } else {
            removed.push(movie_id);
        }
    }
    retained.sort_unstable();
    removed.sort_unstable();
    (retained, removed)
}

pub fn report(ratings: &DataFrame) -> PolarsResult<MovieStats> {
    let stats = movie_stats(ratings)?;
    println!("\n== Movie popularity ==");

    let mut by_count: Vec<(i64, u32)> = stats.counts.iter().map(|(&id, &c)| (id, c)).collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_count.truncate(TOP_K);
    let most_rated = df!(
        "movie id" => by_count.iter().map(|&(id, _)| id).collect::<Vec<_>>(),
        "num ratings" => by_count.iter().map(|&(_, count)| i64::from(count)).collect::<Vec<_>>(),
    )?;
    println!("Most rated movies:\n{most_rated}");

    let mut by_id: Vec<(i64, f64)> = stats.means.iter().map(|(&id, &m)| (id, m)).collect();
    by_id.sort_by_key(|&(id, _)| id);
    by_id.truncate(5);
    let means_head = df!(
        "movie id" => by_id.iter().map(|&(id, _)| id).collect::<Vec<_>>(),
        "mean rating" => by_id.iter().map(|&(_, mean)| mean).collect::<Vec<_>>(),
    )?;
    println!("Average rating per movie, first rows:\n{means_head}");

    let overall = rank_by_mean(&stats, &stats.movie_ids(), TOP_K);
    let top = ranked_frame(&overall)?;
    println!("Top {TOP_K} movies by average rating, all movies:\n{top}");

    Ok(stats)
}

fn ranked_frame(ranked: &[(i64, f64, u32)]) -> PolarsResult<DataFrame> {
    df!(
        "movie id" => ranked.iter().map(|r| r.0).collect::<Vec<_>>(),
        "mean rating" => ranked.iter().map(|r| r.1).collect::<Vec<_>>(),
        "num ratings" => ranked.iter().map(|r| i64::from(r.2)).collect::<Vec<_>>(),
    )
}
