// Network endpoints
//
// Interface listing and control, routing state.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    InterfaceEntry, InterfaceStatusResponse, InterfacesResponse, PreferredRouteRequest,
    RoutingInfo, RoutingResponse, StatusMessage, ToggleRequest,
};

impl ApiClient {
    /// List every interface the appliance knows about.
    ///
    /// `GET /interfaces`
    pub async fn list_interfaces(&self) -> Result<Vec<InterfaceEntry>, Error> {
        let resp: InterfacesResponse = self.get("/interfaces").await?;
        Ok(resp.interfaces)
    }

    /// Current routing state.
    ///
    /// `GET /routing`
    pub async fn get_routing(&self) -> Result<RoutingInfo, Error> {
        let resp: RoutingResponse = self.get("/routing").await?;
        Ok(resp.routing)
    }

    /// Status of a single interface.
    ///
    /// `GET /interface/{name}/status`
    pub async fn get_interface_status(&self, name: &str) -> Result<InterfaceEntry, Error> {
        let url = self.endpoint(&["interface", name, "status"])?;
        let resp: InterfaceStatusResponse = self.get_url(url).await?;
        Ok(resp.interface_status)
    }

    /// Bring an interface up or down.
    ///
    /// `POST /interface/{name}/toggle` with `{"enable": bool}`
    pub async fn toggle_interface(&self, name: &str, enable: bool) -> Result<StatusMessage, Error> {
        let url = self.endpoint(&["interface", name, "toggle"])?;
        debug!(interface = name, enable, "toggling interface");
        self.post_url(url, &ToggleRequest { enable }).await
    }

    /// Route traffic through the named interface.
    ///
    /// `POST /routing/preferred` with `{"interface": name}`
    pub async fn set_preferred_interface(&self, name: &str) -> Result<StatusMessage, Error> {
        debug!(interface = name, "setting preferred interface");
        self.post(
            "/routing/preferred",
            &PreferredRouteRequest {
                interface: name.to_owned(),
            },
        )
        .await
    }
}
