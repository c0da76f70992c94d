use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// An independently switchable privacy tool.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyFeature {
    #[strum(to_string = "VPN", serialize = "vpn")]
    Vpn,
    #[strum(to_string = "Proxy", serialize = "proxy")]
    Proxy,
    #[strum(to_string = "Tor", serialize = "tor")]
    Tor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureState {
    pub enabled: bool,
}

/// Read cache of the service's privacy configuration. Never authoritative:
/// it changes only when a later snapshot says so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyConfig {
    pub vpn: FeatureState,
    pub proxy: FeatureState,
    pub tor: FeatureState,
}

impl PrivacyConfig {
    pub fn get(&self, feature: PrivacyFeature) -> FeatureState {
        match feature {
            PrivacyFeature::Vpn => self.vpn,
            PrivacyFeature::Proxy => self.proxy,
            PrivacyFeature::Tor => self.tor,
        }
    }
}
