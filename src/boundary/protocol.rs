//! Result-code decoding
//!
//! Every game-mutating engine call returns one signed integer whose meaning
//! depends on the protocol version. A [`ResultProtocol`] turns that integer
//! into a [`ResultClass`]; the session never looks at raw codes itself.
//!
//! Only [`ProtocolV3`] exists. Its encoding:
//!
//! | raw value            | class              |
//! |----------------------|--------------------|
//! | `-1`                 | `Continue`         |
//! | `-3`                 | `IllegalMove`      |
//! | `1..=capacity`       | `GameOver(len)`    |
//! | `-2`, `0`, anything else, or a length above the message capacity | `EngineFatal` |

use engine_abi::{ENGINE_ERROR, ENGINE_ILLEGAL_MOVE, ENGINE_OK, PROTOCOL_VERSION};

/// What a raw result code means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultClass {
    /// Move played, game goes on
    Continue,
    /// Move played and ended the game; the message is this many bytes long
    GameOver { message_len: u32 },
    /// Move rejected, nothing changed
    IllegalMove,
    /// The engine is in an unknown state
    EngineFatal { raw: i32 },
}

/// A versioned decoder for engine result codes
pub trait ResultProtocol {
    /// The engine protocol version this decoder understands
    fn version(&self) -> i32;

    /// Classify `raw`. Total: every `i32` maps to exactly one class.
    fn classify(&self, raw: i32) -> ResultClass;
}

/// Decoder for protocol version 3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolV3 {
    message_capacity: u32,
}

impl ProtocolV3 {
    /// `message_capacity` is the size of the region the engine writes
    /// game-over messages into; longer reported lengths are fatal.
    pub fn new(message_capacity: u32) -> Self {
        Self { message_capacity }
    }
}

impl ResultProtocol for ProtocolV3 {
    fn version(&self) -> i32 {
        PROTOCOL_VERSION
    }

    fn classify(&self, raw: i32) -> ResultClass {
        match raw {
            ENGINE_OK => ResultClass::Continue,
            ENGINE_ILLEGAL_MOVE => ResultClass::IllegalMove,
            ENGINE_ERROR => ResultClass::EngineFatal { raw },
            len if len > 0 && len as u32 <= self.message_capacity => ResultClass::GameOver {
                message_len: len as u32,
            },
            _ => ResultClass::EngineFatal { raw },
        }
    }
}
