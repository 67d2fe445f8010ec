pub mod base;
pub mod microsoft_provider;

// Re-export from base.rs so we can do "use crate::providers::*;"
pub use base::*;
