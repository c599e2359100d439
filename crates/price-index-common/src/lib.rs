pub mod cache;
pub mod fallback;
pub mod monitoring;

pub use tracing;
