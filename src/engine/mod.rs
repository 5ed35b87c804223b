pub mod analyzer;
pub mod memstore;
pub mod registry;

pub use analyzer::{analyze, content_id, PropertySet};
pub use memstore::MemStore;
pub use registry::StringRegistry;
