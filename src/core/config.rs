//! Controller configuration
//!
//! [`ControllerConfig`] gathers every knob the host can turn before a
//! session starts: marshalling buffer size, the engine reply delay, who plays
//! which side, the search limits forwarded to the engine and the default
//! overlay. All fields have defaults so a partial JSON file still loads.

use crate::core::error::{CoreError, CoreResult};
use crate::game::types::PlayMode;
use crate::rendering::overlay::OverlayMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacity in bytes of each marshalling region (FEN and message)
pub const DEFAULT_BUFFER_SIZE: u32 = 512;

/// Delay between a human move and the engine's reply, long enough for the
/// host to paint the human move first
pub const DEFAULT_REPLY_DELAY_MS: u64 = 25;

/// Search limits forwarded verbatim to the engine
///
/// The controller never interprets these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub think_time_ms: u32,
    pub depth_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            think_time_ms: 1000,
            depth_limit: 4,
        }
    }
}

/// Everything needed to start a session and render it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub buffer_size: u32,
    pub reply_delay_ms: u64,
    pub play_mode: PlayMode,
    pub settings: Settings,
    pub show_labels: bool,
    pub overlay: OverlayMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            play_mode: PlayMode::default(),
            settings: Settings::default(),
            show_labels: false,
            overlay: OverlayMode::None,
        }
    }
}

impl ControllerConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Reject values the session cannot work with.
    ///
    /// A buffer must at least hold the longest legal FEN (about 90 bytes);
    /// 64 is the hard floor used here.
    pub fn validate(&self) -> CoreResult<()> {
        if self.buffer_size < 64 {
            return Err(CoreError::InvalidConfig {
                message: format!("buffer_size {} is below 64 bytes", self.buffer_size),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_abi::Side;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.buffer_size, 512);
        assert_eq!(config.reply_delay(), Duration::from_millis(25));
        assert_eq!(config.settings.think_time_ms, 1000);
        assert_eq!(config.settings.depth_limit, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ControllerConfig = serde_json::from_str(
            r#"{"show_labels": true, "play_mode": {"kind": "human-vs-engine", "engine_side": "white"}}"#,
        )
        .unwrap();
        assert!(config.show_labels);
        assert_eq!(
            config.play_mode,
            PlayMode::HumanVsEngine {
                engine_side: Side::White
            }
        );
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_tiny_buffer_rejected() {
        let config = ControllerConfig {
            buffer_size: 16,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }
}
