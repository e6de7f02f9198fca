//! HTTP clients for the external collaborators
//!
//! The engine owns no data: sessions come from the session listing API
//! and raw measurements from the result-set storage. These clients are
//! thin typed wrappers; all evaluation logic lives in the engine
//! modules.

pub mod resultset_client;
pub mod session_client;

pub use resultset_client::ResultSetClient;
pub use session_client::SessionApiClient;

use uuid::Uuid;

use gaiteval_common::{CameraAngle, Result, ResultSet, SessionListing};

use crate::history::SessionSource;

/// Production [`SessionSource`] backed by both collaborator clients
pub struct HttpSessionSource {
    pub sessions: SessionApiClient,
    pub results: ResultSetClient,
}

impl HttpSessionSource {
    pub fn new(session_api_base: &str, storage_base: &str) -> Result<Self> {
        Ok(Self {
            sessions: SessionApiClient::new(session_api_base)?,
            results: ResultSetClient::new(storage_base)?,
        })
    }
}

impl SessionSource for HttpSessionSource {
    async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<SessionListing>> {
        self.sessions.list_sessions(user_id).await
    }

    async fn fetch_result_set(&self, session_id: Uuid, angle: CameraAngle) -> Result<ResultSet> {
        self.results.fetch_result_set(session_id, angle).await
    }
}
