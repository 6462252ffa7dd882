use std::error::Error;
use std::path::Path;
use std::time::Instant;

use ml100k::*;

fn main() -> Result<(), Box<dyn Error>> {
    let start = Instant::now();

    let db = data::MovieLensData::load()?;
    println!(
        "Polars is configured to use {} threads.",
        polars_core::POOL.current_num_threads()
    );
    for (name, df) in [("movie", &db.movie), ("ratings", &db.ratings), ("user", &db.user)] {
        println!("\n{name}.csv, first rows:\n{}", df.head(Some(5)));
    }

    overview::report(&db)?;
    let stats = popularity::report(&db.ratings)?;
    top_movies::report(&db, &stats)?;
    let breakdown = demographics::report(&db.ratings, &db.user)?;

    let ages = demographics::user_ages(&db.user)?;
    let out_dir = Path::new(charts::PLOT_DIR);
    charts::render_all(out_dir, &stats, &ages, &breakdown)?;
    println!("\nSaved 4 plots to {}/", out_dir.display());

    println!("Finished in {:.4} seconds", start.elapsed().as_secs_f32());
    Ok(())
}
