pub mod normalize;
pub mod transaction;

pub use normalize::{Normalized, RecordError, normalize};
pub use transaction::{RawRecord, Transaction};

// Re-export tracing for use in this crate
pub use tracing;
