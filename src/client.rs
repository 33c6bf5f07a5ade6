//! Jellyfin client and authenticated session.

use crate::error::{JellyfinError, Result};
use crate::types::{AuthenticateRequest, AuthenticationResult, ClientInfo};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Unauthenticated client bound to one Jellyfin server address.
///
/// Usually obtained from [`resolve`](crate::resolve), which picks the
/// best reachable address for a URL. Calling [`authenticate`] produces
/// an immutable [`Session`]; the client itself never changes and can be
/// reused for further logins.
///
/// # Example
///
/// ```ignore
/// use jellytracks::resolve;
///
/// let client = resolve("https://media.example.com").await?;
/// let session = client.authenticate("alice", "hunter2").await?;
///
/// let shows = session.search_shows("planet earth").await?;
/// println!("found {} shows", shows.len());
/// ```
pub struct JellyfinClient {
    http: Client,
    base_url: String,
    info: ClientInfo,
}

impl JellyfinClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>, info: ClientInfo) -> Result<Self> {
        let base_url: String = base_url.into();
        if base_url.is_empty() {
            return Err(JellyfinError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(JellyfinError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{}/{}", info.name, info.version))
            .build()
            .map_err(JellyfinError::Request)?;

        Ok(Self {
            http,
            base_url,
            info,
        })
    }

    /// The server address this client is bound to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Login with username and password.
    ///
    /// Returns an authenticated [`Session`] carrying the access token
    /// and user id for all subsequent calls.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let url = format!("{}/Users/AuthenticateByName", self.base_url);
        debug!(url = %url, username = %username, "Attempting login");

        let request = AuthenticateRequest {
            username: username.to_string(),
            pw: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .header("X-Emby-Authorization", self.info.authorization(None))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    JellyfinError::ServerUnreachable(e.to_string())
                } else {
                    JellyfinError::Request(e)
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let auth: AuthenticationResult = response.json().await.map_err(|e| {
                JellyfinError::Parse(format!("Failed to parse authentication result: {}", e))
            })?;

            info!(
                user_id = %auth.user.id,
                username = auth.user.name.as_deref().unwrap_or(username),
                "Login successful"
            );

            Ok(Session {
                http: self.http.clone(),
                base_url: self.base_url.clone(),
                info: self.info.clone(),
                access_token: auth.access_token,
                user_id: auth.user.id,
            })
        } else if status.as_u16() == 401 {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Login failed: invalid credentials");
            Err(JellyfinError::AuthFailed(
                "Invalid username or password".to_string(),
            ))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(JellyfinError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

/// An authenticated connection to one Jellyfin server.
///
/// Created by [`JellyfinClient::authenticate`]. The session is an
/// immutable value: token and user id are fixed at login, so a session
/// can be shared across tasks without locking. Dropping it ends the
/// session; nothing is persisted.
pub struct Session {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    info: ClientInfo,
    access_token: String,
    pub(crate) user_id: String,
}

impl Session {
    /// The id of the logged-in user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Issue a GET against an API path, with auth header attached.
    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("X-Emby-Authorization", self.authorization())
    }

    /// Issue a POST against an API path, with auth header attached.
    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("X-Emby-Authorization", self.authorization())
    }

    fn authorization(&self) -> String {
        self.info.authorization(Some(&self.access_token))
    }

    /// Decode a JSON response body, mapping error statuses.
    pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| JellyfinError::Parse(format!("Failed to parse {}: {}", what, e)))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(JellyfinError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation() {
        let info = ClientInfo::default();
        assert!(JellyfinClient::new("https://example.com", info.clone()).is_ok());
        assert!(JellyfinClient::new("http://localhost:8096", info.clone()).is_ok());

        assert!(JellyfinClient::new("", info.clone()).is_err());
        assert!(JellyfinClient::new("example.com", info.clone()).is_err());
        assert!(JellyfinClient::new("ftp://example.com", info).is_err());
    }

    #[test]
    fn url_normalization() {
        let client = JellyfinClient::new("https://example.com/", ClientInfo::default())
            .expect("valid url");
        assert_eq!(client.base_url(), "https://example.com");

        let client = JellyfinClient::new("https://example.com///", ClientInfo::default())
            .expect("valid url");
        assert!(!client.base_url().ends_with('/'));
    }
}
