// Settings endpoints
//
// Privacy configuration, automation status, server-held logs.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AutomationStatusResponse, ConfigPatch, ConfigResponse, LogsResponse, PrivacyConfigBody,
};

impl ApiClient {
    /// `GET /config`
    pub async fn get_config(&self) -> Result<PrivacyConfigBody, Error> {
        let resp: ConfigResponse = self.get("/config").await?;
        Ok(resp.config)
    }

    /// Write a partial configuration and return the service's echo.
    ///
    /// `POST /config`
    ///
    /// The echo is returned loosely typed: backends differ on whether they
    /// wrap it in `config` or return the merged document at top level.
    pub async fn update_config(&self, patch: &ConfigPatch) -> Result<serde_json::Value, Error> {
        debug!(?patch, "updating config");
        self.post("/config", patch).await
    }

    /// `GET /automation/status`
    pub async fn get_automation_status(&self) -> Result<AutomationStatusResponse, Error> {
        self.get("/automation/status").await
    }

    /// Server-held log lines, oldest first as the service stores them.
    ///
    /// `GET /logs`
    pub async fn get_logs(&self) -> Result<Vec<String>, Error> {
        let resp: LogsResponse = self.get("/logs").await?;
        Ok(resp.logs)
    }
}
