//! REST client for the CITC backend.
//!
//! Thin, stateless wrappers: build the request, await the response, return the parsed body. No
//! retries and no caching. A 401 on a signed-in client ends the session before the error is
//! returned.

mod auth;
mod events;
mod team;

use std::sync::Arc;

use reqwest::{header, Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, ErrorBody};
use crate::session::AuthStore;

/// HTTP client bound to one backend and one session store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<AuthStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Arc<AuthStore>) -> Result<Self, AppError> {
        Self::with_client(Client::new(), base_url, auth)
    }

    pub fn with_client(http: Client, base_url: &str, auth: Arc<AuthStore>) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API URL {:?} cannot carry a path",
                base_url.as_str()
            )));
        }
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!("{} {}", method, url);

        let builder = self.http.request(method, url);
        match self.auth.token() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        self.send(self.request(Method::GET, segments)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        self.send(self.request(Method::POST, segments).json(body))
            .await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        self.send(self.request(Method::PUT, segments).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        self.send(self.request(Method::DELETE, segments)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            // Empty bodies (204) decode as JSON null
            let body = if body.trim().is_empty() { "null" } else { &body };
            return Ok(serde_json::from_str(body)?);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        let err = AppError::from_status(status, message);

        if err.is_unauthorized() && self.auth.current_user().is_some() {
            tracing::warn!("Session rejected by server, signing out");
            self.auth.logout();
        } else {
            tracing::debug!("Request failed with {}: {}", status, err);
        }

        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn client(base: &str) -> Result<ApiClient, AppError> {
        let auth = Arc::new(AuthStore::new(Arc::new(MemoryStorage::new())));
        ApiClient::new(base, auth)
    }

    #[test]
    fn test_url_building_encodes_segments() {
        let api = client("http://localhost:5000/api").unwrap();
        assert_eq!(
            api.url(&["events", "intro-to-ai"]).as_str(),
            "http://localhost:5000/api/events/intro-to-ai"
        );
        assert_eq!(
            api.url(&["team", "a b/c"]).as_str(),
            "http://localhost:5000/api/team/a%20b%2Fc"
        );

        let api = client("http://localhost:5000/").unwrap();
        assert_eq!(api.url(&["events"]).as_str(), "http://localhost:5000/events");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(client("not a url"), Err(AppError::Config(_))));
        assert!(matches!(client("mailto:club@citc.dev"), Err(AppError::Config(_))));
    }
}
