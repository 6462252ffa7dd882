pub mod charts;
pub mod data;
pub mod demographics;
pub mod overview;
pub mod popularity;
pub mod top_movies;
