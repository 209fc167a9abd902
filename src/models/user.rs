use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Users are owned by the accounts side of Eventa; the feed only joins on them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}
