use axum::Router;

pub trait HttpLoggingExt<S> {
    fn with_http_logging(self) -> Self;
}

impl<S> HttpLoggingExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Add HTTP logging to Router
    fn with_http_logging(self) -> Router<S> {
        self.layer(
            tower_http::trace::TraceLayer::new_for_http()
                .on_request(|request: &axum::http::Request<_>, _span: &_| {
                    tracing::info!(
                        target: "tower_http",
                        method = %request.method(),
                        path = request.uri().path(),
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &_| {
                        let status = response.status();
                        tracing::info!(
                            target: "tower_http",
                            status = format!("{} {}", status.as_str(), status.canonical_reason().unwrap_or("")),
                            ?latency,
                        )
                    },
                ),
        )
    }
}
