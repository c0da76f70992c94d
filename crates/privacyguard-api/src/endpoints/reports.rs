// Report endpoint

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// Aggregated activity report.
    ///
    /// `GET /reports`
    ///
    /// Returned as raw JSON; shape validation belongs to the caller so a
    /// malformed report can be told apart from a failed request.
    pub async fn get_reports(&self) -> Result<serde_json::Value, Error> {
        self.get("/reports").await
    }
}
