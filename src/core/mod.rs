// Public modules
pub mod config;
pub mod defaults;
pub mod error;
pub mod release;
pub mod rename;
pub mod scene;
pub mod update_check;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
