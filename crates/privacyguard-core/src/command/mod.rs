// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The engine's
// command processor performs the write, reports the outcome, and on
// success runs exactly one follow-up refresh before the command completes.

pub mod requests;

use crate::error::CoreError;
use crate::model::PrivacyFeature;
use crate::scheduler::RefreshOutcome;

pub use requests::{AutomationUpdate, ConfigUpdate};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against the control API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bring an interface up (`enable`) or down.
    ToggleInterface { name: String, enable: bool },
    /// Write a partial configuration.
    SaveConfig(ConfigUpdate),
    /// Switch a single privacy feature; sends only that feature's sub-object.
    SetPrivacyFeature {
        feature: PrivacyFeature,
        enabled: bool,
    },
    SetPreferredInterface { name: String },
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Success text as shown to the user.
    pub message: String,
    /// Outcome of the follow-up refresh.
    pub refresh: RefreshOutcome,
}

fn verb(enable: bool) -> &'static str {
    if enable { "enable" } else { "disable" }
}

impl Command {
    /// Verb phrase naming the attempted action, e.g. `"enable eth0"`.
    pub fn action(&self) -> String {
        match self {
            Self::ToggleInterface { name, enable } => format!("{} {name}", verb(*enable)),
            Self::SaveConfig(_) => "save settings".to_owned(),
            Self::SetPrivacyFeature { feature, enabled } => format!("{} {feature}", verb(*enabled)),
            Self::SetPreferredInterface { name } => format!("set preferred interface to {name}"),
        }
    }

    /// Text reported once the write has succeeded.
    pub fn success_message(&self) -> String {
        match self {
            Self::ToggleInterface { name, enable } => {
                format!("{name} {}d successfully", verb(*enable))
            }
            Self::SaveConfig(_) => "Settings saved successfully".to_owned(),
            Self::SetPrivacyFeature { feature, enabled } => {
                format!("{feature} {}d successfully", verb(*enabled))
            }
            Self::SetPreferredInterface { name } => format!("Preferred interface set to {name}"),
        }
    }

    /// Wrap a transport failure as a command failure for this command.
    pub(crate) fn failed(&self, err: &privacyguard_api::Error) -> CoreError {
        CoreError::Command {
            action: self.action(),
            message: err.to_string(),
        }
    }
}
