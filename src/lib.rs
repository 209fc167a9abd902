//! Eventa buzz: the social feed behind the Eventa event app. Posts carry
//! hashtags, viewers toggle likes, and the feed is served with live
//! counters and a trending-hashtag view.

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod hashtags;
pub mod helpers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod trending;

pub use error::AppError;
