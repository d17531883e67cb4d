//! Duration store implementations.

pub mod file;
pub mod memory;

pub use file::FileDurationStore;
pub use memory::MemoryDurationStore;

use herald_domain::{EpochSeconds, StoreError};
use serde_json::Value;

/// Accepts any finite JSON number; anything else is treated as corruption.
pub(crate) fn decode_timestamp(key: &str, value: &Value) -> Result<EpochSeconds, StoreError> {
    value
        .as_f64()
        .filter(|secs| secs.is_finite())
        .ok_or_else(|| StoreError::Corrupt {
            key: key.to_string(),
            value: value.to_string(),
        })
}
