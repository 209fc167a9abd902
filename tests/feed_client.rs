use std::net::SocketAddr;

use eventa::client::{BuzzApi, BuzzFeed, ClientError, HttpBuzzApi};
use eventa::models::event::Event;
use eventa::models::post::CreatePost;
use eventa::models::user::User;
use eventa::routes;
use eventa::services::memory::PostServiceMem;
use reqwest::StatusCode;
use uuid::Uuid;

struct Server {
    addr: SocketAddr,
    user: Uuid,
    event: Uuid,
}

async fn spawn_server() -> Server {
    let svc = PostServiceMem::new();
    let user = Uuid::now_v7();
    let event = Uuid::now_v7();
    svc.insert_user(User {
        id: user,
        name: "Yaw".into(),
        email: "yaw@example.com".into(),
        avatar: None,
    });
    svc.insert_event(Event {
        id: event,
        name: "Afrobeats Beach Party".into(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::app(svc).into_make_service())
            .await
            .unwrap();
    });
    Server { addr, user, event }
}

fn post(content: &str) -> CreatePost {
    CreatePost {
        content: content.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn feed_round_trip_over_http() {
    let server = spawn_server().await;
    let api = HttpBuzzApi::new(format!("http://{}/api", server.addr))
        .with_token(server.user.to_string());

    let mut req = post("The vibes at #AfrobeatsBeachParty are 🔥 #EventaGhana");
    req.event_id = Some(server.event);
    let created = api.create_post(&req).await.unwrap();
    assert_eq!(created.hashtags, vec!["AfrobeatsBeachParty", "EventaGhana"]);
    assert_eq!(created.event_name.as_deref(), Some("Afrobeats Beach Party"));
    api.create_post(&post("Who else is going? #EventaGhana")).await.unwrap();

    let mut feed = BuzzFeed::new(api);
    feed.refresh().await.unwrap();
    assert_eq!(feed.posts().len(), 2);
    let top = &feed.trending()[0];
    assert_eq!((top.tag.as_str(), top.count, top.trending), ("EventaGhana", 2, false));

    assert!(feed.toggle_like(created.id).await.unwrap());
    let liked = feed.posts().iter().find(|p| p.id == created.id).unwrap();
    assert_eq!((liked.likes, liked.is_liked), (1, true));

    // a fresh load agrees with the optimistic state
    feed.refresh().await.unwrap();
    let liked = feed.posts().iter().find(|p| p.id == created.id).unwrap();
    assert_eq!((liked.likes, liked.is_liked), (1, true));

    feed.select_tag(Some("AfrobeatsBeachParty".into())).await.unwrap();
    assert_eq!(feed.posts().len(), 1);
    assert_eq!(feed.posts()[0].id, created.id);
}

#[tokio::test]
async fn errors_carry_the_server_message() {
    let server = spawn_server().await;
    let base = format!("http://{}/api", server.addr);

    let anonymous = HttpBuzzApi::new(base.clone());
    match anonymous.create_post(&post("hi")).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Authentication required");
        }
        other => panic!("expected 401, got {other:?}"),
    }

    let authed = HttpBuzzApi::new(base).with_token(server.user.to_string());
    match authed.create_post(&post("  ")).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Content is required");
        }
        other => panic!("expected 400, got {other:?}"),
    }

    match authed.toggle_like(Uuid::now_v7()).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("expected 404, got {other:?}"),
    }
}

#[tokio::test]
async fn tag_filter_and_lookup_over_http() {
    let server = spawn_server().await;
    let api = HttpBuzzApi::new(format!("http://{}/api/", server.addr))
        .with_token(server.user.to_string());
    let created = api.create_post(&post("#vibes all night")).await.unwrap();

    assert_eq!(api.list_by_tag("vibes").await.unwrap().len(), 1);
    // reserved characters stay inside the tag segment
    for tag in ["vibes?x", "vibes#frag", "vibes/x", "#vibes"] {
        assert!(api.list_by_tag(tag).await.unwrap().is_empty(), "{tag}");
    }

    api.toggle_like(created.id).await.unwrap();
    let fetched = api.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!((fetched.likes, fetched.is_liked), (1, true));

    match api.get_by_id(Uuid::now_v7()).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Post not found");
        }
        other => panic!("expected 404, got {other:?}"),
    }
}
