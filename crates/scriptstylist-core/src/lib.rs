//! ScriptStylist Core: characters, scripts, configuration and errors.

pub mod character;
pub mod config;
pub mod error;
pub mod script;

pub use character::{Character, CharacterSet, Confidence};
pub use config::{DiscoveryConfig, MatchConfig, StylistConfig};
pub use error::{Error, Result};
pub use script::Script;
