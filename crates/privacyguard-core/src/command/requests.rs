// ── Request types for configuration writes ──

use privacyguard_api::models::{AutomationSettings, ConfigPatch, FeatureToggle};
use serde::{Deserialize, Serialize};

use crate::model::PrivacyFeature;

/// Automation part of a settings write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationUpdate {
    pub enabled: bool,
    /// Seconds between rule evaluations.
    pub check_interval: u64,
}

/// Partial configuration update. `None` fields are left untouched on the
/// service side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation: Option<AutomationUpdate>,
}

impl ConfigUpdate {
    /// An update touching exactly one privacy feature.
    pub fn feature(feature: PrivacyFeature, enabled: bool) -> Self {
        let mut update = Self::default();
        match feature {
            PrivacyFeature::Vpn => update.vpn = Some(enabled),
            PrivacyFeature::Proxy => update.proxy = Some(enabled),
            PrivacyFeature::Tor => update.tor = Some(enabled),
        }
        update
    }

    pub fn to_patch(self) -> ConfigPatch {
        let toggle = |enabled: bool| FeatureToggle { enabled };
        ConfigPatch {
            vpn: self.vpn.map(toggle),
            proxy: self.proxy.map(toggle),
            tor: self.tor.map(toggle),
            automation: self.automation.map(|a| AutomationSettings {
                enabled: a.enabled,
                check_interval: a.check_interval,
            }),
        }
    }
}
