//! Boundary module - everything that touches raw engine values
//!
//! - [`marshaller`] - text and bytes in and out of linear memory
//! - [`protocol`] - result-code classification, pinned per protocol version
//! - [`snapshot`] - the 64-byte piece array

pub mod error;
pub mod marshaller;
pub mod protocol;
pub mod snapshot;

pub use error::{MarshalError, MarshalResult};
pub use marshaller::{read_text, write_text, write_text_exact, MemoryRegion};
pub use protocol::{ProtocolV3, ResultClass, ResultProtocol};
pub use snapshot::BoardSnapshot;
