use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ErrorBody;
use crate::models::post::{CreatePost, FeedEntry, LikeState};
use crate::trending::TrendingTag;

use super::{BuzzApi, ClientError};

/// `BuzzApi` over HTTP. `base_url` is the API root, e.g. `http://host:5000/api`.
#[derive(Clone)]
pub struct HttpBuzzApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBuzzApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    /// Send the identity layer's user id as a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `{base_url}/buzz/{segments..}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("buzz")
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn parse<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }
        let message = match res.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };
        Err(ClientError::Status { status, message })
    }
}

#[async_trait]
impl BuzzApi for HttpBuzzApi {
    async fn list_all(&self) -> Result<Vec<FeedEntry>, ClientError> {
        let res = self.authed(self.http.get(self.url(&[])?)).send().await?;
        Self::parse(res).await
    }

    async fn list_by_tag(&self, tag: &str) -> Result<Vec<FeedEntry>, ClientError> {
        let res = self
            .authed(self.http.get(self.url(&["hashtag", tag])?))
            .send()
            .await?;
        Self::parse(res).await
    }

    async fn get_by_id(&self, post_id: Uuid) -> Result<FeedEntry, ClientError> {
        let res = self
            .authed(self.http.get(self.url(&[&post_id.to_string()])?))
            .send()
            .await?;
        Self::parse(res).await
    }

    async fn trending(&self) -> Result<Vec<TrendingTag>, ClientError> {
        let res = self.http.get(self.url(&["hashtags", "trending"])?).send().await?;
        Self::parse(res).await
    }

    async fn create_post(&self, post: &CreatePost) -> Result<FeedEntry, ClientError> {
        let res = self
            .authed(self.http.post(self.url(&[])?))
            .json(post)
            .send()
            .await?;
        Self::parse(res).await
    }

    async fn toggle_like(&self, post_id: Uuid) -> Result<bool, ClientError> {
        let res = self
            .authed(self.http.post(self.url(&[&post_id.to_string(), "like"])?))
            .send()
            .await?;
        let state: LikeState = Self::parse(res).await?;
        Ok(state.liked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_encoded() {
        let api = HttpBuzzApi::new("http://localhost:5000/api/");
        let url = api.url(&["hashtag", "vibes?x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/buzz/hashtag/vibes%3Fx");
        assert_eq!(url.query(), None);

        let url = api.url(&["hashtag", "vibes#frag"]).unwrap();
        assert_eq!(url.path(), "/api/buzz/hashtag/vibes%23frag");
        assert_eq!(url.fragment(), None);

        let url = api.url(&["hashtag", "a/b"]).unwrap();
        assert_eq!(url.path(), "/api/buzz/hashtag/a%2Fb");
    }

    #[test]
    fn root_base_url() {
        let api = HttpBuzzApi::new("http://localhost:5000");
        assert_eq!(api.url(&[]).unwrap().path(), "/buzz");
        assert!(matches!(
            HttpBuzzApi::new("not a url").url(&[]),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
