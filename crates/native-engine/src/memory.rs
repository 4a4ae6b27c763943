//! Linear memory with a bump allocator
//!
//! Plays the role of a WebAssembly instance's memory. Allocations are never
//! freed; the controller allocates its two string regions once per session
//! and each board reserves a 64-byte snapshot array.

use crate::error::{EngineError, EngineResult};
use engine_abi::WasmPtr;

/// One WebAssembly page
pub const DEFAULT_MEMORY_BYTES: usize = 64 * 1024;

const ALIGN: usize = 8;

#[derive(Debug, Clone)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    next: usize,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            // Address 0 stays unused so it can signal allocation failure
            next: ALIGN,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Reserve `capacity` bytes, `None` when the memory is exhausted
    pub fn alloc(&mut self, capacity: usize) -> Option<WasmPtr> {
        let start = self.next;
        let end = start.checked_add(capacity)?;
        if end > self.bytes.len() {
            return None;
        }
        let ptr = u32::try_from(start).ok()?;
        self.next = end.div_ceil(ALIGN) * ALIGN;
        Some(WasmPtr(ptr))
    }

    pub fn slice(&self, ptr: WasmPtr, len: u32) -> EngineResult<&[u8]> {
        let range = self.range(ptr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, ptr: WasmPtr, len: u32) -> EngineResult<&mut [u8]> {
        let range = self.range(ptr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn range(&self, ptr: WasmPtr, len: u32) -> EngineResult<std::ops::Range<usize>> {
        let start = ptr.offset();
        match start.checked_add(len as usize) {
            Some(end) if !ptr.is_null() && end <= self.bytes.len() => Ok(start..end),
            _ => Err(EngineError::OutOfBounds {
                ptr: ptr.0,
                len,
                size: self.bytes.len(),
            }),
        }
    }
}

impl Default for LinearMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BYTES)
    }
}
