pub mod memory;
pub mod posts;

use diesel_async::pooled_connection::deadpool;
use diesel_async::AsyncPgConnection;

pub type Pool = deadpool::Pool<AsyncPgConnection>;

/// Marker for state that can be shared across axum handlers.
pub trait Svc: Clone + Send + Sync + 'static {}
