pub mod recommendations;
pub mod scoring;

pub use recommendations::{Recommender, RecommenderSettings};
