// Typed endpoint methods
//
// Each submodule adds inherent methods to `ApiClient` for one area of the
// control API.

pub mod network;
pub mod reports;
pub mod settings;
