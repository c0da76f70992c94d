use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Physical medium of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InterfaceKind {
    Wired,
    Wireless,
}

/// One network interface as of the latest snapshot.
///
/// `name` is the unique key. An address the service reported but that
/// does not parse as IPv4 is dropped and reads as "no IP".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    pub name: String,
    pub kind: InterfaceKind,
    pub is_up: bool,
    pub ipv4: Option<Ipv4Addr>,
}
