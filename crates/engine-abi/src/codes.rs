//! Result-code sentinels for protocol version 3
//!
//! | Raw      | Meaning                                               |
//! |----------|-------------------------------------------------------|
//! | `-1`     | action succeeded, play continues                      |
//! | `-2`     | engine state can no longer be trusted                 |
//! | `-3`     | move rejected, board unchanged                        |
//! | `n > 0`  | game over, `n` message bytes written to the msg region |
//!
//! Every other value is outside the protocol. Consumers must treat it as an
//! engine failure.

/// Protocol version this contract describes
pub const PROTOCOL_VERSION: i32 = 3;

/// The requested action succeeded and the game continues
pub const ENGINE_OK: i32 = -1;

/// The engine hit an internal error
pub const ENGINE_ERROR: i32 = -2;

/// The attempted move is not legal in the current position
pub const ENGINE_ILLEGAL_MOVE: i32 = -3;

/// Encode a game-over message length as a result code
///
/// Returns [`ENGINE_ERROR`] for lengths that cannot be represented as a
/// strictly positive code.
pub fn game_over_code(message_len: usize) -> i32 {
    match i32::try_from(message_len) {
        Ok(len) if len > 0 => len,
        _ => ENGINE_ERROR,
    }
}
