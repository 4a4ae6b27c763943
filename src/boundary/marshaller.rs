//! String and byte marshalling through the engine's linear memory
//!
//! The controller owns two fixed regions obtained once at startup, one for
//! FEN text and one for game-over messages. Text is written as raw UTF-8
//! with no terminator; the length travels separately as an argument or a
//! return value. Regions are reused for every call, so whatever was read out
//! of them must be copied before the next engine call.

use crate::boundary::error::{MarshalError, MarshalResult};
use engine_abi::{EngineExports, WasmPtr};
use tracing::debug;

/// A fixed-size buffer inside engine memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    base: WasmPtr,
    capacity: u32,
}

impl MemoryRegion {
    /// Describe an existing region. No allocation takes place.
    pub fn new(base: WasmPtr, capacity: u32) -> Self {
        Self { base, capacity }
    }

    /// Ask the engine for `capacity` bytes.
    pub fn allocate<E: EngineExports + ?Sized>(engine: &mut E, capacity: u32) -> MarshalResult<Self> {
        let base = engine.alloc(capacity);
        if base.is_null() {
            return Err(MarshalError::AllocationFailed { capacity });
        }
        debug!("[MARSHAL] Allocated {} bytes at {:?}", capacity, base);
        Ok(Self { base, capacity })
    }

    pub fn base(&self) -> WasmPtr {
        self.base
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn bytes<'m>(&self, memory: &'m [u8], len: usize) -> MarshalResult<&'m [u8]> {
        let start = self.base.offset();
        memory
            .get(start..start.saturating_add(len))
            .ok_or(MarshalError::OutOfBounds {
                base: self.base,
                len,
                memory_size: memory.len(),
            })
    }

    fn bytes_mut<'m>(&self, memory: &'m mut [u8], len: usize) -> MarshalResult<&'m mut [u8]> {
        let start = self.base.offset();
        let memory_size = memory.len();
        memory
            .get_mut(start..start.saturating_add(len))
            .ok_or(MarshalError::OutOfBounds {
                base: self.base,
                len,
                memory_size,
            })
    }
}

/// Write as much of `text` as fits into `region`.
///
/// Returns the number of bytes written. When the text is longer than the
/// region only a prefix ending on a character boundary is written, so the
/// return value can be shorter than `text.len()`; callers that need the whole
/// text compare the two, or use [`write_text_exact`].
pub fn write_text(memory: &mut [u8], region: MemoryRegion, text: &str) -> MarshalResult<usize> {
    let mut len = text.len().min(region.capacity as usize);
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    region.bytes_mut(memory, len)?.copy_from_slice(&text.as_bytes()[..len]);
    Ok(len)
}

/// Write all of `text` or nothing the engine should look at.
pub fn write_text_exact(memory: &mut [u8], region: MemoryRegion, text: &str) -> MarshalResult<u32> {
    let written = write_text(memory, region, text)?;
    if written < text.len() {
        return Err(MarshalError::Overflow {
            needed: text.len(),
            capacity: region.capacity,
        });
    }
    Ok(written as u32)
}

/// Decode the first `length` bytes of `region` as UTF-8 and copy them out.
pub fn read_text(memory: &[u8], region: MemoryRegion, length: u32) -> MarshalResult<String> {
    if length > region.capacity {
        return Err(MarshalError::LengthExceedsCapacity {
            length,
            capacity: region.capacity,
        });
    }
    let bytes = region.bytes(memory, length as usize)?;
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

/// Copy `len` raw bytes starting at `base`.
pub fn read_bytes(memory: &[u8], base: WasmPtr, len: usize) -> MarshalResult<Vec<u8>> {
    if base.is_null() {
        return Err(MarshalError::NullPointer);
    }
    MemoryRegion::new(base, len as u32)
        .bytes(memory, len)
        .map(<[u8]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> MemoryRegion {
        MemoryRegion::new(WasmPtr(8), 8)
    }

    #[test]
    fn test_write_then_read() {
        let mut memory = vec![0u8; 32];
        let written = write_text(&mut memory, region(), "8/8").unwrap();
        assert_eq!(written, 3);
        assert_eq!(&memory[8..11], b"8/8");
        assert_eq!(read_text(&memory, region(), 3).unwrap(), "8/8");
    }

    #[test]
    fn test_long_text_truncates_to_capacity() {
        let mut memory = vec![0u8; 32];
        let written = write_text(&mut memory, region(), "rnbqkbnr/pppppppp").unwrap();
        assert_eq!(written, 8);
        assert_eq!(memory[16], 0);
        assert!(matches!(
            write_text_exact(&mut memory, region(), "rnbqkbnr/pppppppp"),
            Err(MarshalError::Overflow {
                needed: 17,
                capacity: 8
            })
        ));
    }

    #[test]
    fn test_truncation_stays_on_char_boundary() {
        let mut memory = vec![0u8; 32];
        // seven ascii bytes then a two-byte character straddling the end
        let written = write_text(&mut memory, region(), "abcdefgé").unwrap();
        assert_eq!(written, 7);
    }

    #[test]
    fn test_read_rejects_length_over_capacity() {
        let memory = vec![0u8; 32];
        assert!(matches!(
            read_text(&memory, region(), 9),
            Err(MarshalError::LengthExceedsCapacity {
                length: 9,
                capacity: 8
            })
        ));
    }

    #[test]
    fn test_region_outside_memory() {
        let mut memory = vec![0u8; 12];
        assert!(matches!(
            write_text(&mut memory, region(), "abcdefgh"),
            Err(MarshalError::OutOfBounds { .. })
        ));
        assert!(matches!(
            read_bytes(&memory, WasmPtr::NULL, 4),
            Err(MarshalError::NullPointer)
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut memory = vec![0u8; 32];
        memory[8] = 0xff;
        assert!(matches!(
            read_text(&memory, region(), 1),
            Err(MarshalError::InvalidUtf8(_))
        ));
    }
}
