pub mod key;
pub mod value;

// Re-export commonly used items
pub use key::{ALL, CacheKey, CacheKeyAutoConstruct, filter_segment};
pub use value::{CacheValue, Json};
