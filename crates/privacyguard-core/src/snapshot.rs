// ── View snapshot builder ──
//
// Fans out the four status reads concurrently and assembles one immutable
// snapshot. All-or-nothing: a single failed read fails the whole build and
// nothing partial ever leaves this module.

use chrono::Local;
use privacyguard_api::ApiClient;
use tracing::debug;

use crate::error::CoreError;
use crate::model::ViewSnapshot;

pub const INTERFACES_ENDPOINT: &str = "/interfaces";
pub const ROUTING_ENDPOINT: &str = "/routing";
pub const CONFIG_ENDPOINT: &str = "/config";
pub const AUTOMATION_ENDPOINT: &str = "/automation/status";

/// Build a snapshot from the four status endpoints.
///
/// The reads are issued together and the snapshot is assembled only once
/// all of them have settled. When several fail, the error names the first
/// failing endpoint in the order interfaces, routing, config, automation.
pub async fn build_snapshot(client: &ApiClient) -> Result<ViewSnapshot, CoreError> {
    let (interfaces, routing, config, automation) = tokio::join!(
        client.list_interfaces(),
        client.get_routing(),
        client.get_config(),
        client.get_automation_status(),
    );

    let interfaces = interfaces.map_err(CoreError::aggregation(INTERFACES_ENDPOINT))?;
    let routing = routing.map_err(CoreError::aggregation(ROUTING_ENDPOINT))?;
    let config = config.map_err(CoreError::aggregation(CONFIG_ENDPOINT))?;
    let automation = automation.map_err(CoreError::aggregation(AUTOMATION_ENDPOINT))?;

    debug!(interfaces = interfaces.len(), "snapshot assembled");

    Ok(ViewSnapshot {
        interfaces: interfaces.into_iter().map(Into::into).collect(),
        routing: routing.into(),
        privacy: config.into(),
        automation: automation.into(),
        taken_at: Local::now(),
    })
}
