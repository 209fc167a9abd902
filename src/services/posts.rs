use axum::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types;
use diesel_async::pooled_connection::deadpool::Object;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::error::AppError;
use crate::helpers::IntoInternal;
use crate::models::post::*;
use crate::schema;
use crate::trending::{TrendingTag, TrendingWindow};

use super::{Pool, Svc};

/// Feed queries never return more than this many posts.
pub const FEED_LIMIT: usize = 50;

#[async_trait]
pub trait PostService<E = AppError>: Svc {
    /// Newest posts first.
    async fn list_all(&self, viewer: Option<Uuid>) -> Result<Vec<FeedEntry>, E>;
    /// Newest posts whose tag list holds `tag` exactly (case-sensitive).
    async fn list_by_tag(&self, tag: &str, viewer: Option<Uuid>) -> Result<Vec<FeedEntry>, E>;
    async fn get_by_id(&self, id: Uuid, viewer: Option<Uuid>) -> Result<FeedEntry, E>;
    async fn create_post(&self, author: Uuid, req: CreatePost) -> Result<FeedEntry, E>;
    /// Flip the viewer's like on a post and return the new state.
    async fn toggle_like(&self, id: Uuid, viewer: Uuid) -> Result<bool, E>;
    async fn top_tags(&self, window: TrendingWindow) -> Result<Vec<TrendingTag>, E>;
}

const FEED_SELECT: &str = r#"
SELECT
    bp.id,
    bp.user_id,
    u.name AS user_name,
    u.avatar AS user_avatar,
    bp.content,
    bp.images,
    bp.event_id,
    e.name AS event_name,
    bp.hashtags,
    (SELECT COUNT(*) FROM buzz_likes l WHERE l.post_id = bp.id) AS likes,
    (SELECT COUNT(*) FROM buzz_comments c WHERE c.post_id = bp.id) AS comments,
    (SELECT COUNT(*) FROM buzz_shares s WHERE s.post_id = bp.id) AS shares,
    EXISTS (SELECT 1 FROM buzz_likes l WHERE l.post_id = bp.id AND l.user_id = $1) AS is_liked,
    bp.created_at
FROM buzz_posts bp
INNER JOIN users u ON bp.user_id = u.id
LEFT JOIN events e ON bp.event_id = e.id"#;

const FEED_ORDER: &str = "ORDER BY bp.created_at DESC, bp.id DESC";

// COLLATE "C" keeps the tie-break a plain byte comparison
const TRENDING_SELECT: &str = r#"
SELECT t.tag, COUNT(*) AS count
FROM buzz_posts bp
CROSS JOIN LATERAL unnest(bp.hashtags) AS t(tag)
WHERE bp.created_at > $1
GROUP BY t.tag
ORDER BY count DESC, t.tag COLLATE "C" ASC
LIMIT $2"#;

#[derive(QueryableByName)]
struct TagCount {
    #[diesel(sql_type = sql_types::Text)]
    tag: String,
    #[diesel(sql_type = sql_types::BigInt)]
    count: i64,
}

type PooledConn = Object<AsyncPgConnection>;

#[derive(Clone)]
pub struct PostServiceDb {
    db: Pool,
}

impl Svc for PostServiceDb {}

impl PostServiceDb {
    pub fn new(db: Pool) -> Self {
        Self { db }
    }

    async fn conn(&self) -> Result<PooledConn, AppError> {
        self.db.get().await.into_internal("db pool")
    }

    async fn fetch_one(
        conn: &mut PooledConn,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<FeedEntry, AppError> {
        sql_query(format!("{FEED_SELECT} WHERE bp.id = $2"))
            .bind::<sql_types::Nullable<sql_types::Uuid>, _>(viewer)
            .bind::<sql_types::Uuid, _>(id)
            .get_result::<FeedEntry>(conn)
            .await
            .optional()?
            .ok_or(AppError::NotFound("Post not found"))
    }
}

#[async_trait]
impl PostService<AppError> for PostServiceDb {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self, viewer: Option<Uuid>) -> Result<Vec<FeedEntry>, AppError> {
        let mut conn = self.conn().await?;
        let posts = sql_query(format!("{FEED_SELECT} {FEED_ORDER} LIMIT $2"))
            .bind::<sql_types::Nullable<sql_types::Uuid>, _>(viewer)
            .bind::<sql_types::BigInt, _>(FEED_LIMIT as i64)
            .load::<FeedEntry>(&mut conn)
            .await?;
        Ok(posts)
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_tag(
        &self,
        tag: &str,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, AppError> {
        let mut conn = self.conn().await?;
        let posts = sql_query(format!(
            "{FEED_SELECT} WHERE bp.hashtags @> ARRAY[$2]::text[] {FEED_ORDER} LIMIT $3"
        ))
        .bind::<sql_types::Nullable<sql_types::Uuid>, _>(viewer)
        .bind::<sql_types::Text, _>(tag.to_owned())
        .bind::<sql_types::BigInt, _>(FEED_LIMIT as i64)
        .load::<FeedEntry>(&mut conn)
        .await?;
        Ok(posts)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid, viewer: Option<Uuid>) -> Result<FeedEntry, AppError> {
        let mut conn = self.conn().await?;
        Self::fetch_one(&mut conn, id, viewer).await
    }

    #[tracing::instrument(skip(self, req))]
    async fn create_post(&self, author: Uuid, req: CreatePost) -> Result<FeedEntry, AppError> {
        use schema::buzz_posts::dsl::*;

        let post = Post::new(author, req)?;
        let mut conn = self.conn().await?;

        let new_id = diesel::insert_into(buzz_posts)
            .values(&post)
            .returning(id)
            .get_result::<Uuid>(&mut conn)
            .await?;
        tracing::info!(post = %new_id, tags = post.hashtags.len(), "post created");

        Self::fetch_one(&mut conn, new_id, Some(author)).await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_like(&self, post_id: Uuid, viewer: Uuid) -> Result<bool, AppError> {
        use schema::{buzz_likes, buzz_posts};

        let mut conn = self.conn().await?;
        let conn: &mut AsyncPgConnection = &mut conn;

        // The post row lock serialises toggles on the same post, and the
        // (post_id, user_id) primary key keeps at most one like per pair.
        conn.transaction::<bool, AppError, _>(|conn| {
            async move {
                let locked = buzz_posts::table
                    .find(post_id)
                    .select(buzz_posts::id)
                    .for_no_key_update()
                    .get_result::<Uuid>(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Err(AppError::NotFound("Post not found"));
                }

                let removed = diesel::delete(buzz_likes::table.find((post_id, viewer)))
                    .execute(conn)
                    .await?;
                if removed > 0 {
                    return Ok(false);
                }

                diesel::insert_into(buzz_likes::table)
                    .values(NewLike {
                        post_id,
                        user_id: viewer,
                    })
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn top_tags(&self, window: TrendingWindow) -> Result<Vec<TrendingTag>, AppError> {
        let mut conn = self.conn().await?;
        let cutoff: DateTime<Utc> = window.cutoff(Utc::now());
        let rows = sql_query(TRENDING_SELECT)
            .bind::<sql_types::Timestamptz, _>(cutoff)
            .bind::<sql_types::BigInt, _>(window.limit as i64)
            .load::<TagCount>(&mut conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| TrendingTag::new(r.tag, r.count))
            .collect())
    }
}
