use uuid::Uuid;

use crate::hashtags::{self, Segment};
use crate::models::post::FeedEntry;
use crate::trending::TrendingTag;

use super::{BuzzApi, ClientError};

/// State behind the buzz screen: the visible posts, the trending chips and
/// the active tag filter.
pub struct BuzzFeed<A> {
    api: A,
    posts: Vec<FeedEntry>,
    trending: Vec<TrendingTag>,
    selected_tag: Option<String>,
}

impl<A: BuzzApi> BuzzFeed<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            posts: Vec::new(),
            trending: Vec::new(),
            selected_tag: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn posts(&self) -> &[FeedEntry] {
        &self.posts
    }

    pub fn trending(&self) -> &[TrendingTag] {
        &self.trending
    }

    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    /// Reload posts (filtered by the selected tag) and trending tags.
    /// Trending is best-effort: on failure the previous chips stay.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.posts = match &self.selected_tag {
            Some(tag) => self.api.list_by_tag(tag).await?,
            None => self.api.list_all().await?,
        };

        match self.api.trending().await {
            Ok(tags) => self.trending = tags,
            Err(e) => tracing::warn!(%e, "failed to load trending hashtags"),
        }
        Ok(())
    }

    /// Selecting the active tag again clears the filter.
    pub async fn select_tag(&mut self, tag: Option<String>) -> Result<(), ClientError> {
        self.selected_tag = match tag {
            Some(t) if self.selected_tag.as_deref() == Some(t.as_str()) => None,
            other => other,
        };
        self.refresh().await
    }

    /// Optimistically flip the like, then settle on the server's answer.
    /// A failed request restores the post exactly as it was.
    pub async fn toggle_like(&mut self, post_id: Uuid) -> Result<bool, ClientError> {
        let Some(snapshot) = self.post(post_id).map(|p| (p.likes, p.is_liked)) else {
            // not on screen; just forward the toggle
            return self.api.toggle_like(post_id).await;
        };
        self.set_liked(post_id, !snapshot.1);

        match self.api.toggle_like(post_id).await {
            Ok(liked) => {
                self.set_liked(post_id, liked);
                Ok(liked)
            }
            Err(e) => {
                tracing::warn!(%post_id, %e, "like failed, reverting");
                if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
                    (post.likes, post.is_liked) = snapshot;
                }
                Err(e)
            }
        }
    }

    fn post(&self, post_id: Uuid) -> Option<&FeedEntry> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Set the local liked flag and move the count with it.
    fn set_liked(&mut self, post_id: Uuid, liked: bool) {
        let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) else {
            return;
        };
        if post.is_liked != liked {
            post.likes = (post.likes + if liked { 1 } else { -1 }).max(0);
            post.is_liked = liked;
        }
    }
}

/// Split post text for rendering, with tags as tappable segments.
pub fn highlight(content: &str) -> Vec<Segment> {
    hashtags::segments(content)
}
