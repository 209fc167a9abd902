use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::{MaybeViewer, Viewer};
use crate::error::AppError;
use crate::hashtags;
use crate::models::post::{CreatePost, FeedEntry, LikeState};
use crate::services::posts::PostService;
use crate::trending::{TrendingTag, TrendingWindow};

// Malformed ids cannot name a post, so they share the 404.
fn post_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse().map_err(|_| AppError::NotFound("Post not found"))
}

async fn list_all<S: PostService>(
    State(svc): State<S>,
    MaybeViewer(viewer): MaybeViewer,
) -> Result<Json<Vec<FeedEntry>>, AppError> {
    Ok(Json(svc.list_all(viewer).await?))
}

async fn trending<S: PostService>(
    State(svc): State<S>,
) -> Result<Json<Vec<TrendingTag>>, AppError> {
    Ok(Json(svc.top_tags(TrendingWindow::default()).await?))
}

async fn by_tag<S: PostService>(
    State(svc): State<S>,
    Path(hashtag): Path<String>,
    MaybeViewer(viewer): MaybeViewer,
) -> Result<Json<Vec<FeedEntry>>, AppError> {
    // no stored tag can match text outside the grammar
    if !hashtags::is_tag(&hashtag) {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(svc.list_by_tag(&hashtag, viewer).await?))
}

async fn get_post<S: PostService>(
    State(svc): State<S>,
    Path(id): Path<String>,
    MaybeViewer(viewer): MaybeViewer,
) -> Result<Json<FeedEntry>, AppError> {
    Ok(Json(svc.get_by_id(post_id(&id)?, viewer).await?))
}

async fn create_post<S: PostService>(
    State(svc): State<S>,
    Viewer(author): Viewer,
    payload: Result<Json<CreatePost>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedEntry>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let post = svc.create_post(author, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn toggle_like<S: PostService>(
    State(svc): State<S>,
    Viewer(viewer): Viewer,
    Path(id): Path<String>,
) -> Result<Json<LikeState>, AppError> {
    let liked = svc.toggle_like(post_id(&id)?, viewer).await?;
    Ok(Json(LikeState { liked }))
}

pub fn router<S: PostService>() -> Router<S> {
    Router::new()
        .route("/", get(list_all::<S>).post(create_post::<S>))
        .route("/hashtags/trending", get(trending::<S>))
        .route("/hashtag/:hashtag", get(by_tag::<S>))
        .route("/:id", get(get_post::<S>))
        .route("/:id/like", post(toggle_like::<S>))
}
