//! Result-set storage client
//!
//! Fetches the vision pipeline's tabular output for one (session,
//! angle) recording and parses it at the boundary. The per-stride
//! aggregate lives at `{session}/{angle}.csv`, the frame-by-frame
//! variant at `{session}/{angle}_frames.csv`.

use std::time::Duration;

use uuid::Uuid;

use gaiteval_common::{CameraAngle, Error, FrameSeries, Result, ResultSet};

const USER_AGENT: &str = concat!("gaiteval/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Typed client for the result-set storage collaborator
pub struct ResultSetClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResultSetClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Collaborator(format!("result-set client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and parse one angle's aggregate result set
    pub async fn fetch_result_set(
        &self,
        session_id: Uuid,
        angle: CameraAngle,
    ) -> Result<ResultSet> {
        let url = format!("{}/sessions/{}/{}.csv", self.base_url, session_id, angle);
        let text = self.fetch_text(&url, session_id, angle).await?;
        ResultSet::parse(session_id, angle, &text)
    }

    /// Fetch and parse one angle's frame-by-frame series
    pub async fn fetch_frame_series(
        &self,
        session_id: Uuid,
        angle: CameraAngle,
    ) -> Result<FrameSeries> {
        let url = format!(
            "{}/sessions/{}/{}_frames.csv",
            self.base_url, session_id, angle
        );
        let text = self.fetch_text(&url, session_id, angle).await?;
        FrameSeries::parse(session_id, angle, &text)
    }

    async fn fetch_text(&self, url: &str, session_id: Uuid, angle: CameraAngle) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Collaborator(format!("result-set fetch: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "result set for session {session_id}, angle {angle}"
            )));
        }
        if !response.status().is_success() {
            return Err(Error::Collaborator(format!(
                "result-set storage returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Collaborator(format!("result-set body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_storage_layout() {
        let client = ResultSetClient::new("http://store.test/store/").unwrap();
        let sid = Uuid::nil();
        assert_eq!(
            format!(
                "{}/sessions/{}/{}.csv",
                client.base_url,
                sid,
                CameraAngle::RightToLeft
            ),
            format!("http://store.test/store/sessions/{sid}/right_to_left.csv")
        );
    }
}
