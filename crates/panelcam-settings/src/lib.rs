//! PanelCAM Settings Crate
//!
//! Handles machining parameters, their defaults, and the flat key/value
//! overlays used to customise them per request.

pub mod config;
pub mod error;

pub use config::{MachiningParameters, ParameterOverlay, ProcessOrder};
pub use error::{SettingsError, SettingsResult};
