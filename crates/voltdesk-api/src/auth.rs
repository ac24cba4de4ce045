// Authentication endpoint
//
// Login exchanges credentials for a bearer token. The token is not
// installed automatically; the caller decides whether to persist it and
// calls `set_token`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// Identity returned alongside a fresh token.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub role_name: Option<String>,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
    user: LoginUser,
}

/// A fresh bearer token and the identity it belongs to.
#[derive(Debug)]
pub struct LoginResponse {
    pub token: SecretString,
    pub user: LoginUser,
}

impl ApiClient {
    /// Authenticate with username + password.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(username, "logging in");
        let data = self
            .post::<LoginData>(
                "auth/login",
                &LoginBody {
                    username,
                    password: password.expose_secret(),
                },
            )
            .await?
            .into_data()?;
        Ok(LoginResponse {
            token: SecretString::from(data.token),
            user: data.user,
        })
    }
}
