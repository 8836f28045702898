//! # faro-settings
//!
//! Configuration management with layered sources for the faro push service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`FaroSettings::default()`]
//! 2. **User file** — `~/.faro/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `FARO_*` overrides (highest priority)
//!
//! The server loads settings once at boot and passes a snapshot down; there
//! is no global singleton and no runtime reload.
//!
//! # Usage
//!
//! ```no_run
//! let settings = faro_settings::load_settings()?;
//! println!("listening on port {}", settings.server.port);
//! # Ok::<(), faro_settings::SettingsError>(())
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, expand_home, load_settings, load_settings_from_path, settings_path};
pub use types::*;
