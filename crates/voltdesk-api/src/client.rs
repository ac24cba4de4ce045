// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining, per-request bearer
// auth, and envelope unwrapping. Endpoint groups (collection CRUD, role
// powers, auth) live in sibling modules as inherent methods so this file
// stays focused on transport mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::envelope::{Envelope, classify};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the voltdesk backend.
///
/// Every response is expected in the `{ success, data, message }` envelope.
/// The helpers here return the parsed envelope; endpoint methods decide
/// whether `data` is mandatory.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: ArcSwapOption<SecretString>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://ems.example.com/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: ArcSwapOption::empty(),
        }
    }

    /// Convenience for tests and tools holding the base URL as a string.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Url::parse(base_url)?))
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Credential ───────────────────────────────────────────────────

    /// Install the bearer token attached to every subsequent request.
    pub fn set_token(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    /// Drop the bearer token; later requests go out unauthenticated.
    pub fn clear_token(&self) {
        self.token.store(None);
    }

    pub fn has_token(&self) -> bool {
        self.token.load().is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a relative path onto the API root: `{base}/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a GET request and parse the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let resp = self.request(reqwest::Method::GET, url).send().await?;
        parse(resp).await
    }

    /// Send a POST request with JSON body and parse the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        let resp = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        parse(resp).await
    }

    /// Send a PUT request with JSON body and parse the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);
        let resp = self
            .request(reqwest::Method::PUT, url)
            .json(body)
            .send()
            .await?;
        parse(resp).await
    }

    /// Send a DELETE request and parse the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);
        let resp = self.request(reqwest::Method::DELETE, url).send().await?;
        parse(resp).await
    }
}

async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Envelope<T>, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    classify(status, &body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client =
            ApiClient::from_reqwest("https://ems.example.com/api/", reqwest::Client::new())
                .unwrap();
        assert_eq!(
            client.url("/devices/7").unwrap().as_str(),
            "https://ems.example.com/api/devices/7"
        );
    }

    #[test]
    fn token_can_be_installed_and_cleared() {
        let client =
            ApiClient::from_reqwest("http://localhost:8080", reqwest::Client::new()).unwrap();
        assert!(!client.has_token());
        client.set_token(SecretString::from("abc".to_owned()));
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }
}
