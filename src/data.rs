use std::path::{Path, PathBuf};

use polars::prelude::*;

// movie.csv:   movie id, movie title, release date, video release date, genre
// ratings.csv: user id, movie id, rating (integer 1-5)
// user.csv:    user id, age, gender, occupation

pub const MOVIE_FILE: &str = "movie.csv";
pub const RATINGS_FILE: &str = "ratings.csv";
pub const USER_FILE: &str = "user.csv";

pub struct MovieLensData {
    pub movie: DataFrame,
    pub ratings: DataFrame,
    pub user: DataFrame,
}

impl MovieLensData {
    /// Loads the three tables from the working directory.
    pub fn load() -> PolarsResult<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> PolarsResult<Self> {
        Ok(MovieLensData {
            movie: read_csv(dir.join(MOVIE_FILE))?,
            ratings: read_csv(dir.join(RATINGS_FILE))?,
            user: read_csv(dir.join(USER_FILE))?,
        })
    }
}

fn read_csv(path: PathBuf) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path))?
        .finish()
}
