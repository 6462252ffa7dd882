use polars::prelude::*;
use rustc_hash::FxHashMap as HashMap;

use crate::popularity;

#[derive(Debug, PartialEq)]
pub struct Breakdown {
    /// (gender, mean rating, rating count), sorted by gender.
    pub by_gender: Vec<(String, f64, u32)>,
    /// (occupation, rating count), sorted by count descending then name.
    pub by_occupation: Vec<(String, u32)>,
    pub joined_rows: usize,
    pub unmatched_ratings: usize,
}

impl Breakdown {
    /// First `k` occupations by rating count, clamped to what exists.
    /// The printed table and the occupation chart both select through
    /// this so they cannot disagree.
    pub fn top_occupations(&self, k: usize) -> &[(String, u32)] {
        &self.by_occupation[..k.min(self.by_occupation.len())]
    }
}

/// Joins each rating to its user row and aggregates by gender and
/// occupation. Ratings whose user id has no user row are counted in
/// `unmatched_ratings` and excluded from every aggregate.
pub fn breakdown(ratings: &DataFrame, user: &DataFrame) -> PolarsResult<Breakdown> {
    let users: HashMap<i64, (&str, &str)> = user
        .column("user id")?
        .i64()?
        .into_iter()
        .zip(user.column("gender")?.str()?)
        .zip(user.column("occupation")?.str()?)
        .filter_map(|((user_id, gender), occupation)| {
            if let (Some(user_id), Some(gender), Some(occupation)) = (user_id, gender, occupation) {
                Some((user_id, (gender, occupation)))
            } else {
                None
            }
        })
        .collect();

    let mut gender_acc: HashMap<&str, (i64, u32)> = HashMap::default();
    let mut occupation_acc: HashMap<&str, u32> = HashMap::default();
    let mut joined_rows = 0;
    let mut unmatched_ratings = 0;

    for (user_id, rating) in ratings
        .column("user id")?
        .i64()?
        .into_iter()
        .zip(ratings.column("rating")?.i64()?)
    {
        if let (Some(user_id), Some(rating)) = (user_id, rating) {
            match users.get(&user_id) {
                Some(&(gender, occupation)) => {
                    joined_rows += 1;
                    let e = gender_acc.entry(gender).or_default();
                    e.0 += rating;
                    e.1 += 1;
                    *occupation_acc.entry(occupation).or_default() += 1;
                }
                None => unmatched_ratings += 1,
            }
        }
    }

    let mut by_gender: Vec<(String, f64, u32)> = gender_acc
        .into_iter()
        .map(|(gender, (sum, count))| (gender.to_string(), sum as f64 / f64::from(count), count))
        .collect();
    by_gender.sort_by(|a, b| a.0.cmp(&b.0));

    let mut by_occupation: Vec<(String, u32)> = occupation_acc
        .into_iter()
        .map(|(occupation, count)| (occupation.to_string(), count))
        .collect();
    by_occupation.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(Breakdown {
        by_gender,
        by_occupation,
        joined_rows,
        unmatched_ratings,
    })
}

pub fn user_ages(user: &DataFrame) -> PolarsResult<Vec<f64>> {
    Ok(user
        .column("age")?
        .i64()?
        .into_iter()
        .flatten()
        .map(|age| age as f64)
        .collect())
}

pub fn report(ratings: &DataFrame, user: &DataFrame) -> PolarsResult<Breakdown> {
    let b = breakdown(ratings, user)?;
    println!("\n== Audience demographics ==");
    if b.unmatched_ratings > 0 {
        println!("Dropped {} ratings with no matching user row", b.unmatched_ratings);
    }

    let genders = df!(
        "gender" => b.by_gender.iter().map(|g| g.0.as_str()).collect::<Vec<_>>(),
        "mean rating" => b.by_gender.iter().map(|g| g.1).collect::<Vec<_>>(),
        "num ratings" => b.by_gender.iter().map(|g| i64::from(g.2)).collect::<Vec<_>>(),
    )?;
    println!("Average rating by gender:\n{genders}");

    let top = b.top_occupations(popularity::TOP_K);
    let occupations = df!(
        "occupation" => top.iter().map(|o| o.0.as_str()).collect::<Vec<_>>(),
        "num ratings" => top.iter().map(|o| i64::from(o.1)).collect::<Vec<_>>(),
    )?;
    println!(
        "Top {} occupations by number of ratings:\n{occupations}",
        popularity::TOP_K
    );
    Ok(b)
}
