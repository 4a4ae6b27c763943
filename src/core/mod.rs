//! Core module - configuration and its persistence
//!
//! - [`ControllerConfig`] - startup knobs (buffers, reply delay, play mode,
//!   engine search limits, display defaults)
//! - [`settings_persistence`] - JSON load/save under the user's config dir
//! - [`CoreError`] - failures of the above

pub mod config;
pub mod error;
pub mod settings_persistence;

pub use config::{ControllerConfig, Settings, DEFAULT_BUFFER_SIZE, DEFAULT_REPLY_DELAY_MS};
pub use error::{CoreError, CoreResult};
pub use settings_persistence::{default_config_path, load_config, load_config_or_default, save_config};
