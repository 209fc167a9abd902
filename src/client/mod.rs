//! Typed client for the buzz API and the feed-screen state built on it.

pub mod api;
pub mod feed;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::models::post::{CreatePost, FeedEntry};
use crate::trending::TrendingTag;

pub use api::HttpBuzzApi;
pub use feed::BuzzFeed;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[async_trait]
pub trait BuzzApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<FeedEntry>, ClientError>;
    async fn list_by_tag(&self, tag: &str) -> Result<Vec<FeedEntry>, ClientError>;
    async fn get_by_id(&self, post_id: Uuid) -> Result<FeedEntry, ClientError>;
    async fn trending(&self) -> Result<Vec<TrendingTag>, ClientError>;
    async fn create_post(&self, post: &CreatePost) -> Result<FeedEntry, ClientError>;
    /// Returns the server's liked state after the toggle.
    async fn toggle_like(&self, post_id: Uuid) -> Result<bool, ClientError>;
}
