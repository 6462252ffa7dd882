use std::error::Error;
use std::fs::create_dir_all;
use std::path::Path;

use plotters::prelude::*;

use crate::demographics::Breakdown;
use crate::popularity::{MovieStats, TOP_K};

pub const PLOT_DIR: &str = "plots";

const RATINGS_BINS: usize = 50;
const AGE_BINS: usize = 10;
const PLOT_SIZE: (u32, u32) = (900, 600);

/// Equal-width bins over [min, max] as (start, end, count) triples.
/// Every bin is closed on the left; the last is also closed on the
/// right so the maximum lands in it. Degenerate input (all values
/// equal) falls back to width 1.
pub fn bin_counts(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut width = (max - min) / bins as f64;
    if width <= 0.0 {
        width = 1.0;
    }

    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + i as f64 * width, min + (i + 1) as f64 * width, count))
        .collect()
}

fn draw_histogram(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bins: &[(f64, f64, usize)],
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = bins.first().map_or(0.0, |b| b.0);
    let x_max = bins.last().map_or(1.0, |b| b.1);
    let y_max = bins.iter().map(|b| b.2).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0usize..y_max + y_max / 20 + 1)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    chart.draw_series(bins.iter().filter(|b| b.2 > 0).map(|&(start, end, count)| {
        Rectangle::new([(start, 0usize), (end, count)], BLUE.mix(0.8).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn draw_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = values.iter().copied().fold(0.0f64, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0..labels.len().max(1)).into_segmented(), 0.0..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|seg: &SegmentValue<usize>| match seg {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.8).filled())
            .margin(10)
            .data(values.iter().enumerate().map(|(i, &v)| (i, v))),
    )?;

    root.present()?;
    Ok(())
}

/// Renders the four plots into `out_dir`, creating it if needed.
pub fn render_all(
    out_dir: &Path,
    stats: &MovieStats,
    ages: &[f64],
    breakdown: &Breakdown,
) -> Result<(), Box<dyn Error>> {
    create_dir_all(out_dir)?;

    let counts: Vec<f64> = stats.counts.values().map(|&c| f64::from(c)).collect();
    draw_histogram(
        &out_dir.join("ratings_per_movie.svg"),
        "Distribution of Ratings per Movie",
        "Number of Ratings",
        "Number of Movies",
        &bin_counts(&counts, RATINGS_BINS),
    )?;

    draw_histogram(
        &out_dir.join("user_ages.svg"),
        "Age Distribution of MovieLens Users",
        "Age",
        "Number of Users",
        &bin_counts(ages, AGE_BINS),
    )?;

    let labels: Vec<String> = breakdown.by_gender.iter().map(|g| g.0.clone()).collect();
    let values: Vec<f64> = breakdown.by_gender.iter().map(|g| g.1).collect();
    draw_bar_chart(
        &out_dir.join("rating_by_gender.svg"),
        "Average Rating by Gender",
        "Gender",
        "Average Rating",
        &labels,
        &values,
    )?;

    let top = breakdown.top_occupations(TOP_K);
    let labels: Vec<String> = top.iter().map(|o| o.0.clone()).collect();
    let values: Vec<f64> = top.iter().map(|o| f64::from(o.1)).collect();
    draw_bar_chart(
        &out_dir.join("ratings_by_occupation.svg"),
        "Top 10 Occupations by Number of Ratings",
        "Occupation",
        "Number of Ratings",
        &labels,
        &values,
    )?;

    Ok(())
}
