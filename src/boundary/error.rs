//! Error types for moving bytes across the engine boundary

use engine_abi::WasmPtr;
use thiserror::Error;

/// Errors raised by the marshaller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// Engine returned a null pointer from `alloc`
    #[error("Engine could not allocate {capacity} bytes")]
    AllocationFailed { capacity: u32 },

    /// Engine handed back a null base address
    #[error("Engine returned a null pointer")]
    NullPointer,

    /// Region does not fit inside the engine's linear memory
    #[error("Region at {base:?} of {len} bytes exceeds linear memory of {memory_size} bytes")]
    OutOfBounds {
        base: WasmPtr,
        len: usize,
        memory_size: usize,
    },

    /// Text is longer than the region it must be written into
    #[error("Text of {needed} bytes does not fit into {capacity} bytes")]
    Overflow { needed: usize, capacity: u32 },

    /// Engine reported more bytes than the region can hold
    #[error("Reported length {length} exceeds region capacity {capacity}")]
    LengthExceedsCapacity { length: u32, capacity: u32 },

    /// Engine wrote bytes that are not UTF-8
    #[error("Engine text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Result type alias for marshalling
pub type MarshalResult<T> = Result<T, MarshalError>;
