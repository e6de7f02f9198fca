//! Session listing API client
//!
//! Read-only view of the collaborator that owns analysis sessions
//! (creation, upload, and processing state are its concern, not ours).

use std::time::Duration;

use uuid::Uuid;

use gaiteval_common::{Error, Result, SessionListing};

const USER_AGENT: &str = concat!("gaiteval/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the session listing collaborator
pub struct SessionApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SessionApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Collaborator(format!("session API client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// All sessions belonging to a user, any status
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionListing>> {
        let url = format!("{}/users/{}/sessions", self.base_url, user_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Collaborator(format!("session listing: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("user {user_id}")));
        }
        if !response.status().is_success() {
            return Err(Error::Collaborator(format!(
                "session listing returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Collaborator(format!("session listing payload: {e}")))
    }

    /// One session by id
    pub async fn get_session(&self, session_id: Uuid) -> Result<SessionListing> {
        let url = format!("{}/sessions/{}", self.base_url, session_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Collaborator(format!("session lookup: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("session {session_id}")));
        }
        if !response.status().is_success() {
            return Err(Error::Collaborator(format!(
                "session lookup returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Collaborator(format!("session payload: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = SessionApiClient::new("http://sessions.test/api/").unwrap();
        assert_eq!(client.base_url, "http://sessions.test/api");
    }
}
