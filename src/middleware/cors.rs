use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{self, CorsLayer};

pub trait CorsExt<S> {
    fn with_cors(self, origins: &[String]) -> anyhow::Result<Router<S>>;
}

impl<S> CorsExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Add CORS to Router. No configured origins means any origin; an origin
    /// that is not a valid header value is a configuration error.
    fn with_cors(self, origins: &[String]) -> anyhow::Result<Router<S>> {
        let allow_origin = if origins.is_empty() {
            cors::AllowOrigin::any()
        } else {
            let allowed = origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            tracing::debug!(origins = allowed.len(), "CORS restricted to configured origins");
            cors::AllowOrigin::list(allowed)
        };

        let cors_layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);

        Ok(self.layer(cors_layer))
    }
}
