use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::hashtags;

// the input to our `create_post` handler
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    /// Accepted for compatibility, never trusted: tags are derived from `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// A stored post row. Immutable once written.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::buzz_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub event_id: Option<Uuid>,
    pub hashtags: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Validate a request and build the row to insert.
    pub fn new(author: Uuid, req: CreatePost) -> Result<Self, AppError> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(AppError::InvalidInput("Content is required".into()));
        }

        let hashtags = hashtags::extract(content);
        if let Some(declared) = req.hashtags.as_ref().filter(|d| **d != hashtags) {
            tracing::debug!(?declared, derived = ?hashtags, "ignoring client-declared hashtags");
        }

        Ok(Self {
            id: Uuid::now_v7(),
            user_id: author,
            content: content.to_owned(),
            event_id: req.event_id,
            hashtags,
            images: req.images.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = crate::schema::buzz_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewLike {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

/// A post as the feed shows it: joined author and event, live counters and
/// whether the requesting viewer liked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, QueryableByName)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[diesel(sql_type = sql_types::Uuid)]
    pub id: Uuid,
    #[diesel(sql_type = sql_types::Uuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = sql_types::Text)]
    pub user_name: String,
    #[diesel(sql_type = sql_types::Nullable<sql_types::Text>)]
    pub user_avatar: Option<String>,
    #[diesel(sql_type = sql_types::Text)]
    pub content: String,
    #[diesel(sql_type = sql_types::Array<sql_types::Text>)]
    pub images: Vec<String>,
    #[diesel(sql_type = sql_types::Nullable<sql_types::Uuid>)]
    pub event_id: Option<Uuid>,
    #[diesel(sql_type = sql_types::Nullable<sql_types::Text>)]
    pub event_name: Option<String>,
    #[diesel(sql_type = sql_types::Array<sql_types::Text>)]
    pub hashtags: Vec<String>,
    #[diesel(sql_type = sql_types::BigInt)]
    pub likes: i64,
    #[diesel(sql_type = sql_types::BigInt)]
    pub comments: i64,
    #[diesel(sql_type = sql_types::BigInt)]
    pub shares: i64,
    #[diesel(sql_type = sql_types::Bool)]
    pub is_liked: bool,
    #[diesel(sql_type = sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(content: &str) -> CreatePost {
        CreatePost {
            content: content.into(),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_blank_content() {
        for content in ["", "   ", "\n\t "] {
            let err = Post::new(Uuid::now_v7(), req(content)).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[test]
    fn trims_and_derives_tags() {
        let mut r = req("  Great night at #AfroFest! #vibes #vibes  ");
        r.hashtags = Some(vec!["spoofed".into()]);
        let post = Post::new(Uuid::now_v7(), r).unwrap();
        assert_eq!(post.content, "Great night at #AfroFest! #vibes #vibes");
        assert_eq!(post.hashtags, vec!["AfroFest", "vibes", "vibes"]);
        assert!(post.images.is_empty());
    }

    #[test]
    fn request_uses_camel_case() {
        let r: CreatePost = serde_json::from_str(
            r#"{"content":"hi","eventId":"0190a5b0-0000-7000-8000-000000000000","images":["a.png"]}"#,
        )
        .unwrap();
        assert!(r.event_id.is_some());
        assert_eq!(r.images, Some(vec!["a.png".to_owned()]));

        let missing: CreatePost = serde_json::from_str("{}").unwrap();
        assert!(missing.content.is_empty());
    }
}
