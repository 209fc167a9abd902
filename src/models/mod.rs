pub mod event;
pub mod post;
pub mod user;

use serde::Deserialize;

use self::{event::Event, user::User};

/// Users and events preloaded into the in-memory store.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub events: Vec<Event>,
}
