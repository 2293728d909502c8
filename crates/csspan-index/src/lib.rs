//! csspan Range Index
//!
//! Per-tree store of resolved byte ranges with reverse lookup
//! ("which node covers this offset"). Used by both the engine tree and the
//! foreign tree so the two agree on offset semantics.

mod search;
mod store;

pub use search::locate;
pub use store::{RangeStore, RangeStoreBuilder};

use csspan_text::TextError;

/// Range index error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error("Key already indexed at ordinal {ordinal}")]
    DuplicateKey { ordinal: usize },
}
