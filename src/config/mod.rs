// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod logging;
mod scalar;
pub mod session;
pub mod types;

pub use logging::*;
pub use session::*;
pub use types::*;
