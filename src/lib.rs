//! Listing marketplace recommender
//!
//! Ranks approved property listings for a user by blending content
//! similarity against stated preferences with the behaviour of users who
//! interact with listings the same way.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
