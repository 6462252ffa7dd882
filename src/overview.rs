use ahash::HashSet;
use polars::prelude::*;

use crate::data::MovieLensData;

#[derive(Debug, PartialEq, Eq)]
pub struct RatingOverview {
    pub total_ratings: usize,
    pub distinct_users: usize,
    pub distinct_movies: usize,
    pub min_rating: i64,
    pub max_rating: i64,
}

pub fn print_table_info(name: &str, df: &DataFrame) {
    println!("{name}: {} rows, {} columns", df.height(), df.width());
    for col in df.get_columns() {
        let non_null = col.len() - col.null_count();
        println!("  {:<20} {:>6} non-null  {}", col.name().as_str(), non_null, col.dtype());
    }
}

/// Per-column summary of every numeric column, one row per statistic:
/// count, mean, std (ddof 1), min, the three quartiles, max. Quartiles
/// interpolate linearly between the two nearest order statistics.
pub fn describe(df: &DataFrame) -> PolarsResult<DataFrame> {
    const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    let mut columns = vec![Column::new("statistic".into(), STATS)];
    for col in df.get_columns() {
        if !is_numeric(col.dtype()) {
            continue;
        }
        let mut vals: Vec<f64> = col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .collect();
        if vals.is_empty() {
            return Err(PolarsError::NoData(
                format!("column '{}' has no values to describe", col.name()).into(),
            ));
        }
        vals.sort_by(f64::total_cmp);

        let n = vals.len();
        let mean = vals.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            (vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        });

        let stats = vec![
            Some(n as f64),
            Some(mean),
            std,
            Some(vals[0]),
            Some(quantile(&vals, 0.25)),
            Some(quantile(&vals, 0.5)),
            Some(quantile(&vals, 0.75)),
            Some(vals[n - 1]),
        ];
        columns.push(Column::new(col.name().clone(), stats));
    }
    DataFrame::new(columns)
}

pub fn rating_overview(ratings: &DataFrame) -> PolarsResult<RatingOverview> {
    let users: HashSet<i64> = ratings
        .column("user id")?
        .i64()?
        .into_iter()
        .flatten()
        .collect();
    let movies: HashSet<i64> = ratings
        .column("movie id")?
        .i64()?
        .into_iter()
        .flatten()
        .collect();
    let rating = ratings.column("rating")?.i64()?;

    let empty = || PolarsError::NoData("ratings table has no rating values".into());
    Ok(RatingOverview {
        total_ratings: ratings.height(),
        distinct_users: users.len(),
        distinct_movies: movies.len(),
        min_rating: rating.min().ok_or_else(empty)?,
        max_rating: rating.max().ok_or_else(empty)?,
    })
}

pub fn report(db: &MovieLensData) -> PolarsResult<()> {
    println!("\n== Dataset overview ==");
    println!(
        "Movie: {:?} Ratings: {:?} User: {:?}",
        db.movie.shape(),
        db.ratings.shape(),
        db.user.shape()
    );
    for (name, df) in [("movie", &db.movie), ("user", &db.user), ("ratings", &db.ratings)] {
        print_table_info(name, df);
    }

    println!("\nSummary statistics, user:\n{}", describe(&db.user)?);
    println!("Summary statistics, ratings:\n{}", describe(&db.ratings)?);

    let ov = rating_overview(&db.ratings)?;
    println!("Total number of ratings: {}", ov.total_ratings);
    println!("Number of unique users who rated movies: {}", ov.distinct_users);
    println!("Number of unique movies that received ratings: {}", ov.distinct_movies);
    println!("Minimum rating value: {}", ov.min_rating);
    println!("Maximum rating value: {}", ov.max_rating);
    Ok(())
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
    )
}

// `sorted` must be ascending and non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
