//! Process-local store backed by [`dashmap`]. Used for development runs
//! (`store = "memory"`) and as the store behind the router tests.

use std::collections::HashSet;
use std::sync::Arc;

use axum::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::event::Event;
use crate::models::post::*;
use crate::models::user::User;
use crate::models::Seed;
use crate::trending::{self, TrendingTag, TrendingWindow};

use super::posts::{PostService, FEED_LIMIT};
use super::Svc;

#[derive(Default)]
struct MemStore {
    posts: DashMap<Uuid, Post>,
    /// post id -> viewers who liked it
    likes: DashMap<Uuid, HashSet<Uuid>>,
    comments: DashMap<Uuid, i64>,
    shares: DashMap<Uuid, i64>,
    users: DashMap<Uuid, User>,
    events: DashMap<Uuid, Event>,
}

#[derive(Clone, Default)]
pub struct PostServiceMem {
    inner: Arc<MemStore>,
}

impl Svc for PostServiceMem {}

impl PostServiceMem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, seed: Seed) {
        for u in seed.users {
            self.inner.users.insert(u.id, u);
        }
        for e in seed.events {
            self.inner.events.insert(e.id, e);
        }
    }

    pub fn insert_user(&self, user: User) {
        self.inner.users.insert(user.id, user);
    }

    pub fn insert_event(&self, event: Event) {
        self.inner.events.insert(event.id, event);
    }

    pub fn record_comment(&self, post_id: Uuid) {
        *self.inner.comments.entry(post_id).or_default() += 1;
    }

    pub fn record_share(&self, post_id: Uuid) {
        *self.inner.shares.entry(post_id).or_default() += 1;
    }

    pub fn like_rows(&self, post_id: Uuid) -> usize {
        self.inner.likes.get(&post_id).map_or(0, |v| v.len())
    }

    #[cfg(test)]
    fn backdate(&self, post_id: Uuid, created_at: chrono::DateTime<Utc>) {
        if let Some(mut p) = self.inner.posts.get_mut(&post_id) {
            p.created_at = created_at;
        }
    }

    /// Returns `None` when the author is unknown, matching the inner join.
    fn enrich(&self, post: &Post, viewer: Option<Uuid>) -> Option<FeedEntry> {
        let author = self.inner.users.get(&post.user_id)?;
        let event_name = post
            .event_id
            .and_then(|id| self.inner.events.get(&id).map(|e| e.name.clone()));
        let count = |m: &DashMap<Uuid, i64>| m.get(&post.id).map(|c| *c).unwrap_or(0);
        let (likes, is_liked) = match self.inner.likes.get(&post.id) {
            Some(v) => (v.len() as i64, viewer.is_some_and(|u| v.contains(&u))),
            None => (0, false),
        };

        Some(FeedEntry {
            id: post.id,
            user_id: post.user_id,
            user_name: author.name.clone(),
            user_avatar: author.avatar.clone(),
            content: post.content.clone(),
            images: post.images.clone(),
            event_id: post.event_id,
            event_name,
            hashtags: post.hashtags.clone(),
            likes,
            comments: count(&self.inner.comments),
            shares: count(&self.inner.shares),
            is_liked,
            created_at: post.created_at,
        })
    }

    fn feed<F>(&self, keep: F, viewer: Option<Uuid>) -> Vec<FeedEntry>
    where
        F: Fn(&Post) -> bool,
    {
        let mut posts: Vec<Post> = self
            .inner
            .posts
            .iter()
            .filter(|p| keep(p.value()))
            .map(|p| p.value().clone())
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        posts
            .iter()
            .filter_map(|p| self.enrich(p, viewer))
            .take(FEED_LIMIT)
            .collect()
    }
}

#[async_trait]
impl PostService<AppError> for PostServiceMem {
    async fn list_all(&self, viewer: Option<Uuid>) -> Result<Vec<FeedEntry>, AppError> {
        Ok(self.feed(|_| true, viewer))
    }

    async fn list_by_tag(
        &self,
        tag: &str,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, AppError> {
        Ok(self.feed(|p| p.hashtags.iter().any(|t| t == tag), viewer))
    }

    async fn get_by_id(&self, id: Uuid, viewer: Option<Uuid>) -> Result<FeedEntry, AppError> {
        let post = self
            .inner
            .posts
            .get(&id)
            .map(|p| p.value().clone())
            .ok_or(AppError::NotFound("Post not found"))?;
        self.enrich(&post, viewer)
            .ok_or(AppError::NotFound("Post not found"))
    }

    #[tracing::instrument(skip(self, req))]
    async fn create_post(&self, author: Uuid, req: CreatePost) -> Result<FeedEntry, AppError> {
        let post = Post::new(author, req)?;
        let unknown_event = post
            .event_id
            .is_some_and(|id| !self.inner.events.contains_key(&id));
        if !self.inner.users.contains_key(&author) || unknown_event {
            return Err(AppError::InvalidInput(
                "Referenced user or event does not exist".into(),
            ));
        }

        let id = post.id;
        self.inner.posts.insert(id, post);
        tracing::info!(post = %id, "post created");
        self.get_by_id(id, Some(author)).await
    }

    async fn toggle_like(&self, post_id: Uuid, viewer: Uuid) -> Result<bool, AppError> {
        if !self.inner.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("Post not found"));
        }
        // the entry guard holds the shard lock for the whole check-and-flip
        let mut viewers = self.inner.likes.entry(post_id).or_default();
        let liked = !viewers.remove(&viewer);
        if liked {
            viewers.insert(viewer);
        }
        Ok(liked)
    }

    async fn top_tags(&self, window: TrendingWindow) -> Result<Vec<TrendingTag>, AppError> {
        let cutoff = window.cutoff(Utc::now());
        let occurrences: Vec<String> = self
            .inner
            .posts
            .iter()
            .filter(|p| p.created_at > cutoff)
            .flat_map(|p| p.hashtags.clone())
            .collect();
        Ok(trending::rank(occurrences, window.limit))
    }
}
